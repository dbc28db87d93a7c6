//! Service contracts: the default template and per-client drafts.

use chrono::NaiveDate;

use crate::client::Client;

/// Printed in place of a contract that was never saved.
pub const EMPTY_CONTRACT: &str = "Contrato não preenchido.";

const CLIENT_NAME_PLACEHOLDER: &str = "[Nome do Cliente]";
const TODAY_PLACEHOLDER: &str = "[Data de Hoje]";

pub const DEFAULT_TEMPLATE: &str = "\
CONTRATO DE PRESTAÇÃO DE SERVIÇOS DE CERIMONIAL

CONTRATADA: [Seu Nome ou Empresa], CPF/CNPJ: [Seu Documento], residente e domiciliada em [Seu Endereço].

CONTRATANTE: [Nome do Cliente], CPF: [Documento do Cliente], residente e domiciliado em [Endereço do Cliente].

OBJETO: O presente contrato tem por objeto a prestação de serviços de cerimonial e assessoria para o evento [Nome do Evento], a realizar-se no dia [Data] às [Hora].

CLÁUSULA 1ª - DOS SERVIÇOS: A CONTRATADA compromete-se a realizar o planejamento, coordenação e execução do cerimonial no dia do evento.

CLÁUSULA 2ª - DOS HONORÁRIOS: Pela prestação dos serviços, o CONTRATANTE pagará à CONTRATADA o valor de R$ [Valor], da seguinte forma: [Forma de Pagamento].

CLÁUSULA 3ª - DA RESCISÃO: O presente contrato poderá ser rescindido por ambas as partes com aviso prévio de 30 dias.

Foro: As partes elegem o foro de [Sua Cidade] para dirimir quaisquer dúvidas oriundas deste contrato.

[Sua Cidade], [Data de Hoje]

__________________________________________
CONTRATADA

__________________________________________
CONTRATANTE";

/// `dd/mm/yyyy`, the format used on contracts and report headers.
pub fn format_date(date: NaiveDate) -> String { date.format("%d/%m/%Y").to_string() }

/// The default template with the client's name and today's date filled in.
/// The remaining placeholders are left for the planner to edit.
pub fn draft(client_name: &str, today: NaiveDate) -> String {
  DEFAULT_TEMPLATE
    .replacen(CLIENT_NAME_PLACEHOLDER, client_name, 1)
    .replacen(TODAY_PLACEHOLDER, &format_date(today), 1)
}

/// The text to open in the editor: the saved contract, or a fresh draft.
pub fn editable_text(client: &Client, today: NaiveDate) -> String {
  client.contract.clone().unwrap_or_else(|| draft(&client.name, today))
}

/// The text to print: the saved contract, or [`EMPTY_CONTRACT`].
pub fn printable_text(client: &Client) -> &str {
  client.contract.as_deref().unwrap_or(EMPTY_CONTRACT)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn today() -> NaiveDate { NaiveDate::from_ymd_opt(2026, 3, 9).unwrap() }

  #[test]
  fn draft_fills_name_and_date() {
    let text = draft("Maria Silva", today());
    assert!(text.contains("CONTRATANTE: Maria Silva, CPF"));
    assert!(text.contains("[Sua Cidade], 09/03/2026"));
    assert!(!text.contains(CLIENT_NAME_PLACEHOLDER));
    assert!(text.contains("[Nome do Evento]"));
  }

  #[test]
  fn saved_contract_wins() {
    let mut client = Client::new("Maria", "m@example.com", "1");
    assert!(editable_text(&client, today()).starts_with("CONTRATO DE PRESTAÇÃO"));
    assert_eq!(printable_text(&client), EMPTY_CONTRACT);

    client.contract = Some("Acordo simples".into());
    assert_eq!(editable_text(&client, today()), "Acordo simples");
    assert_eq!(printable_text(&client), "Acordo simples");
  }
}

//! Field registry for the EFD-Contribuições layout.
//!
//! Static reference data mapping `(record type, field index)` to the official
//! field name and description from the Guia Prático. Only the record types the
//! rectifier actually works with are covered; lookups for anything else fall
//! back to a generic label, which is a normal outcome, not an error.
//!
//! Field index 0 is always the `REG` identifier itself, matching the 0-based
//! indexing of [`crate::record::EfdRecord`].

use std::collections::HashMap;
use std::sync::OnceLock;

/// Name and description of one positional field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub description: &'static str,
}

type LayoutTable = &'static [FieldDescriptor];

static LAYOUT: OnceLock<HashMap<&'static str, LayoutTable>> = OnceLock::new();

macro_rules! field {
    ($name:literal, $descr:literal) => {
        FieldDescriptor {
            name: $name,
            description: $descr,
        }
    };
}

fn build_layout() -> HashMap<&'static str, LayoutTable> {
    let mut map: HashMap<&'static str, LayoutTable> = HashMap::new();

    map.insert(
        "0000",
        &[
            field!("REG", "Identificador do Registro"),
            field!("COD_VER", "Código da versão do leiaute"),
            field!("TIPO_ESCRIT", "Tipo de escrituração (0-Original; 1-Retificadora)"),
            field!("IND_SIT_ESP", "Indicador de situação especial"),
            field!("NUM_REC_ANTERIOR", "Número do recibo da escrituração anterior a ser retificada"),
            field!("DT_INI", "Data de início do período da escrituração (DDMMAAAA)"),
            field!("DT_FIN", "Data de fim do período da escrituração (DDMMAAAA)"),
            field!("NOME", "Nome empresarial da pessoa jurídica"),
            field!("CNPJ", "CNPJ da pessoa jurídica"),
            field!("UF", "Unidade Federativa da pessoa jurídica"),
            field!("COD_MUN", "Código do município do domicílio fiscal (Tabela IBGE)"),
            field!("SUFRAMA", "Inscrição na Suframa"),
            field!("IND_NAT_PJ", "Indicador da natureza da pessoa jurídica"),
            field!("IND_ATIV", "Indicador do tipo de atividade preponderante"),
        ],
    );

    map.insert(
        "0001",
        &[
            field!("REG", "Identificador do Registro"),
            field!("IND_MOV", "Indicador de movimento (0-Bloco com dados; 1-Bloco sem dados)"),
        ],
    );

    // Regime de apuração da contribuição. The official record has more
    // fields; the tail is uncovered and falls back to the generic label.
    map.insert(
        "0110",
        &[
            field!("REG", "Identificador do Registro"),
            field!("COD_INC_TRIB", "Indicador do regime de incidência (1-Não Cumulativo; 2-Cumulativo; 3-Ambos)"),
            field!("VL_REC_BRU_NC_TOT_PER", "Receita Bruta Não-Cumulativa Total no Período"),
            field!("VL_REC_BRU_CUM_TOT_PER", "Receita Bruta Cumulativa Total no Período"),
        ],
    );

    map.insert(
        "M001",
        &[
            field!("REG", "Identificador do Registro"),
            field!("IND_MOV", "Indicador de movimento (0-Bloco com dados; 1-Bloco sem dados)"),
        ],
    );

    map.insert(
        "M100",
        &[
            field!("REG", "Identificador do Registro"),
            field!("COD_CRED", "Código de Tipo de Crédito apurado no período"),
            field!("IND_CRED_ORI", "Indicador de Crédito Oriundo (0-Operações próprias; 1-Evento de incorporação, cisão ou fusão)"),
            field!("VL_BC_PIS", "Valor da Base de Cálculo do Crédito"),
            field!("ALIQ_PIS", "Alíquota do PIS/PASEP (em percentual)"),
            field!("QUANT_BC_PIS", "Quantidade – Base de cálculo PIS"),
            field!("ALIQ_PIS_QUANT", "Alíquota do PIS (em reais)"),
            field!("VL_CRED", "Valor total do crédito apurado no período"),
            field!("VL_AJUS_ACRES", "Valor total dos ajustes de acréscimo"),
            field!("VL_AJUS_REDUC", "Valor total dos ajustes de redução"),
            field!("VL_CRED_DIF", "Valor total do crédito diferido no período"),
            field!("VL_CRED_DISP", "Valor Total do Crédito Disponível relativo ao Período (07 + 08 – 09 – 10)"),
            field!("IND_DESC_CRED", "Indicador de opção de utilização do crédito disponível no período (0-Uso Total; 1-Uso Parcial)"),
            field!("VL_CRED_DESC", "Valor do Crédito disponível, descontado da contribuição apurada no próprio período"),
            field!("SLD_CRED", "Saldo de créditos a utilizar em períodos futuros (11 – 13)"),
        ],
    );

    map.insert(
        "M200",
        &[
            field!("REG", "Identificador do Registro"),
            field!("VL_TOT_CONT_NC_PER", "Valor Total da Contribuição Não Cumulativa do Período (PIS)"),
            field!("VL_TOT_CRED_DESC_PER", "Valor Total do Crédito Descontado no Período (PIS)"),
            field!("VL_TOT_CRED_DESC_ANT_PER", "Valor Total do Crédito Descontado em Período Anterior (PIS)"),
            field!("VL_TOT_CONT_NC_DEV", "Valor Total da Contribuição Não Cumulativa Devolvida no Período (PIS)"),
            field!("VL_RET_NC", "Valor das Retenções na Fonte Não Cumulativas (PIS)"),
        ],
    );

    map.insert(
        "M210",
        &[
            field!("REG", "Identificador do Registro"),
            field!("COD_CONT", "Código da Contribuição Social (conforme Tabela 4.3.5)"),
            field!("VL_REC_BRT", "Valor da Receita Bruta"),
            field!("VL_BC_CONT", "Valor da Base de Cálculo da Contribuição"),
            field!("ALIQ_PIS", "Alíquota do PIS/Pasep (em percentual)"),
            field!("VL_CONT_APUR", "Valor da Contribuição Apurada"),
            field!("VL_CRED_PIS", "Valor do Crédito de PIS/Pasep a Descontar"),
        ],
    );

    // COFINS mirror of M210, same positional structure.
    map.insert(
        "M610",
        &[
            field!("REG", "Identificador do Registro"),
            field!("COD_CONT", "Código da Contribuição Social (conforme Tabela 4.3.5)"),
            field!("VL_REC_BRT", "Valor da Receita Bruta"),
            field!("VL_BC_CONT", "Valor da Base de Cálculo da Contribuição"),
            field!("ALIQ_COFINS", "Alíquota da COFINS (em percentual)"),
            field!("VL_CONT_APUR", "Valor da Contribuição Apurada"),
            field!("VL_CRED_COFINS", "Valor do Crédito da COFINS a Descontar"),
        ],
    );

    map.insert(
        "1001",
        &[
            field!("REG", "Identificador do Registro"),
            field!("IND_MOV", "Indicador de movimento (0-Bloco com dados; 1-Bloco sem dados)"),
        ],
    );

    map.insert(
        "1100",
        &[
            field!("REG", "Identificador do Registro"),
            field!("PER_APU_CRED", "Período de Apuração do Crédito (MM/AAAA)"),
            field!("ORIG_CRED", "Indicador da origem do crédito (01-Operações próprias; 02-Transferido por pessoa jurídica sucedida)"),
            field!("CNPJ_SUC", "CNPJ da pessoa jurídica cedente do crédito (se ORIG_CRED = 02)"),
            field!("COD_CRED", "Código do Tipo do Crédito"),
            field!("VL_CRED_APU", "Valor total do crédito apurado na EFD (Registro M100) ou em demonstrativo DACON de período anterior"),
            field!("VL_CRED_EXT_APU", "Valor de Crédito Extemporâneo Apurado (Registro 1101), referente a Período Anterior"),
            field!("VL_TOT_CRED_APU", "Valor Total do Crédito Apurado (06 + 07)"),
            field!("VL_CRED_DESC_PA_ANT", "Valor do Crédito utilizado mediante Desconto, em Período(s) Anterior(es)"),
            field!("VL_CRED_PER_PA_ANT", "Valor do Crédito utilizado mediante Pedido de Ressarcimento, em Período(s) Anterior(es)"),
            field!("VL_CRED_DCOMP_PA_ANT", "Valor do Crédito utilizado mediante Declaração de Compensação Intermediária, em Período(s) Anterior(es)"),
            field!("SD_CRED_DISP_EFD", "Saldo do Crédito Disponível para Utilização neste Período de Escrituração (08 – 09 – 10 - 11)"),
            field!("VL_CRED_DESC_EFD", "Valor do Crédito descontado neste período de escrituração"),
            field!("VL_CRED_PER_EFD", "Valor do Crédito objeto de Pedido de Ressarcimento (PER) neste período de escrituração"),
            field!("VL_CRED_DCOMP_EFD", "Valor do Crédito utilizado mediante Declaração de Compensação Intermediária neste período"),
            field!("VL_CRED_TRANS", "Valor do crédito transferido em evento de cisão, fusão ou incorporação"),
            field!("VL_CRED_OUT", "Valor do crédito utilizado por outras formas"),
            field!("SLD_CRED_FIM", "Saldo de créditos a utilizar em período de apuração futuro (12 – 13 – 14 – 15 – 16 - 17)"),
        ],
    );

    map.insert(
        "1900",
        &[
            field!("REG", "Identificador do Registro"),
            field!("CNPJ", "CNPJ do estabelecimento"),
            field!("COD_MOD", "Código do modelo do documento fiscal (02, 2D)"),
            field!("SER", "Série do documento fiscal"),
            field!("SUB_SER", "Subsérie do documento fiscal"),
        ],
    );

    map
}

fn layout() -> &'static HashMap<&'static str, LayoutTable> {
    LAYOUT.get_or_init(build_layout)
}

/// Look up the descriptor for a field. `None` for unregistered record types or
/// indices past the covered prefix of a record.
pub fn describe(record_type: &str, field_index: usize) -> Option<&'static FieldDescriptor> {
    layout().get(record_type)?.get(field_index)
}

/// Display label for a field: the official name when registered, otherwise a
/// generic positional label.
pub fn field_label(record_type: &str, field_index: usize) -> String {
    match describe(record_type, field_index) {
        Some(descriptor) => descriptor.name.to_string(),
        None => format!("Campo {}", field_index),
    }
}

/// Record types present in the registry, sorted. Used by the CLI `describe`
/// command to list what it can explain.
pub fn registered_types() -> Vec<&'static str> {
    let mut types: Vec<&'static str> = layout().keys().copied().collect();
    types.sort_unstable();
    types
}

/// Number of fields the registry covers for a record type (0 if unknown).
pub fn covered_fields(record_type: &str) -> usize {
    layout().get(record_type).map_or(0, |t| t.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_field_has_official_name() {
        let d = describe("M210", 5).expect("M210 field 5 is registered");
        assert_eq!(d.name, "VL_CONT_APUR");
        assert_eq!(d.description, "Valor da Contribuição Apurada");
    }

    #[test]
    fn test_index_zero_is_always_reg() {
        for ty in registered_types() {
            assert_eq!(describe(ty, 0).map(|d| d.name), Some("REG"), "type {ty}");
        }
    }

    #[test]
    fn test_unknown_type_is_absent_not_error() {
        assert!(describe("9999", 3).is_none());
        assert_eq!(field_label("9999", 3), "Campo 3");
    }

    #[test]
    fn test_index_past_coverage_falls_back() {
        assert!(describe("1900", 42).is_none());
        assert_eq!(field_label("1900", 42), "Campo 42");
    }

    #[test]
    fn test_credit_fields_of_m100() {
        assert_eq!(describe("M100", 11).map(|d| d.name), Some("VL_CRED_DISP"));
        assert_eq!(describe("M100", 12).map(|d| d.name), Some("IND_DESC_CRED"));
        assert_eq!(describe("M100", 13).map(|d| d.name), Some("VL_CRED_DESC"));
        assert_eq!(describe("M100", 14).map(|d| d.name), Some("SLD_CRED"));
    }
}

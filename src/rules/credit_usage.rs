//! Credit usage split for the M100 credit record.
//!
//! Working fields:
//!
//! | index | field         |
//! |-------|---------------|
//! | 11    | VL_CRED_DISP  (available credit)          |
//! | 12    | IND_DESC_CRED (0-Uso Total; 1-Uso Parcial) |
//! | 13    | VL_CRED_DESC  (credit used this period)   |
//! | 14    | SLD_CRED      (balance carried forward)   |
//!
//! The used amount is clamped to the available amount (the field is corrected
//! in place), the indicator tracks whether the full credit was consumed, and
//! the balance is the difference. A negative used amount is refused outright.

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::RuleError;
use crate::numeric::{format_field_decimal, parse_field_decimal};
use crate::record::EfdRecord;

use super::{check_writable, require_field, write_if_changed, ChangedFields, EfdRule};

const IDX_AVAILABLE: usize = 11;
const IDX_INDICATOR: usize = 12;
const IDX_USED: usize = 13;
const IDX_BALANCE: usize = 14;

const IND_USO_TOTAL: &str = "0";
const IND_USO_PARCIAL: &str = "1";

/// Reconciles `VL_CRED_DESC`, `IND_DESC_CRED` and `SLD_CRED` on M100 against
/// the available credit.
pub struct CreditUsageSplit;

impl EfdRule for CreditUsageSplit {
    fn record_type(&self) -> &'static str {
        "M100"
    }

    fn name(&self) -> &'static str {
        "Ajustar Utilização de Crédito (M100)"
    }

    fn description(&self) -> &'static str {
        "Limita o crédito descontado ao crédito disponível, ajusta o indicador de utilização e recalcula o saldo."
    }

    fn apply(
        &self,
        record: &mut EfdRecord,
        _all_records: &[EfdRecord],
    ) -> Result<ChangedFields, RuleError> {
        let available = parse_field_decimal(IDX_AVAILABLE, require_field(record, IDX_AVAILABLE)?)?;
        let used_raw = parse_field_decimal(IDX_USED, require_field(record, IDX_USED)?)?;

        if used_raw.is_sign_negative() && !used_raw.is_zero() {
            return Err(RuleError::NegativeValue {
                index: IDX_USED,
                value: record.field(IDX_USED).unwrap_or_default().to_string(),
            });
        }
        if available.is_sign_negative() && !available.is_zero() {
            return Err(RuleError::NegativeValue {
                index: IDX_AVAILABLE,
                value: record.field(IDX_AVAILABLE).unwrap_or_default().to_string(),
            });
        }

        check_writable(record, &[IDX_INDICATOR, IDX_USED, IDX_BALANCE])?;

        // Silently auto-correct an over-consumption instead of refusing it.
        let used = if used_raw > available { available } else { used_raw };

        // Full consumption of an actual credit is "uso total"; everything
        // else, including the zero-available case, stays "uso parcial" (the
        // indicator policy inherited from the upstream layout tooling).
        let indicator = if used == available && available > Decimal::ZERO {
            IND_USO_TOTAL
        } else {
            IND_USO_PARCIAL
        };
        let balance = available - used;

        let mut changed = ChangedFields::new();
        write_if_changed(record, IDX_INDICATOR, indicator.to_string(), &mut changed);
        write_if_changed(record, IDX_USED, format_field_decimal(used), &mut changed);
        write_if_changed(record, IDX_BALANCE, format_field_decimal(balance), &mut changed);
        debug!(
            %available,
            %used,
            indicator,
            clamped = used != used_raw,
            "credit usage reconciled"
        );
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// M100 with 15 fields; only the credit-usage block varies per test.
    fn m100(available: &str, indicator: &str, used: &str, balance: &str) -> EfdRecord {
        let fields = vec![
            "M100", "101", "0", "10000,00", "1,65", "", "", "165,00", "0,00", "0,00", "0,00",
            available, indicator, used, balance,
        ];
        EfdRecord::new(fields.into_iter().map(String::from).collect()).expect("valid record")
    }

    #[test]
    fn test_partial_use() {
        let mut rec = m100("165,00", "", "100,00", "");
        let changed = CreditUsageSplit.apply(&mut rec, &[]).expect("rule applies");
        assert_eq!(changed, vec![12, 14]);
        assert_eq!(rec.field(12), Some("1"), "partial use indicator");
        assert_eq!(rec.field(13), Some("100,00"));
        assert_eq!(rec.field(14), Some("65,00"));
    }

    #[test]
    fn test_total_use() {
        let mut rec = m100("165,00", "1", "165,00", "65,00");
        let changed = CreditUsageSplit.apply(&mut rec, &[]).expect("rule applies");
        assert_eq!(changed, vec![12, 14]);
        assert_eq!(rec.field(12), Some("0"), "total use indicator");
        assert_eq!(rec.field(14), Some("0,00"));
    }

    #[test]
    fn test_clamp_law() {
        // Used beyond the available credit: clamp down, zero balance.
        let mut rec = m100("165,00", "", "200,00", "");
        let changed = CreditUsageSplit.apply(&mut rec, &[]).expect("rule applies");
        assert_eq!(rec.field(13), Some("165,00"), "used clamped to available");
        assert_eq!(rec.field(14), Some("0,00"), "no balance after full use");
        assert_eq!(rec.field(12), Some("0"));
        assert_eq!(changed, vec![12, 13, 14]);
    }

    #[test]
    fn test_zero_available_defaults_to_partial_use() {
        let mut rec = m100("0,00", "", "50,00", "");
        CreditUsageSplit.apply(&mut rec, &[]).expect("rule applies");
        assert_eq!(rec.field(13), Some("0,00"), "used clamped to zero");
        assert_eq!(rec.field(12), Some("1"), "zero credit is never 'uso total'");
        assert_eq!(rec.field(14), Some("0,00"));
    }

    #[test]
    fn test_negative_used_is_refused_without_mutation() {
        let mut rec = m100("165,00", "", "-10,00", "");
        let err = CreditUsageSplit.apply(&mut rec, &[]).unwrap_err();
        assert_eq!(
            err,
            RuleError::NegativeValue {
                index: 13,
                value: "-10,00".into()
            }
        );
        assert_eq!(rec.field(13), Some("-10,00"), "record must be untouched");
        assert_eq!(rec.field(12), Some(""));
    }

    #[test]
    fn test_idempotent_second_application() {
        let mut rec = m100("165,00", "", "200,00", "");
        let first = CreditUsageSplit.apply(&mut rec, &[]).expect("first pass");
        assert!(!first.is_empty());
        let second = CreditUsageSplit.apply(&mut rec, &[]).expect("second pass");
        assert!(second.is_empty(), "second pass must confirm, not change");
    }

    #[test]
    fn test_short_record_is_refused() {
        let mut rec = EfdRecord::new(
            vec!["M100", "101"].into_iter().map(String::from).collect(),
        )
        .expect("valid record");
        let err = CreditUsageSplit.apply(&mut rec, &[]).unwrap_err();
        assert!(matches!(err, RuleError::MissingField { index: 11, .. }));
    }
}

//! Contribution recomputation for the M210 (PIS) and M610 (COFINS)
//! detail records.
//!
//! Both records share the same positional structure:
//!
//! | index | field        |
//! |-------|--------------|
//! | 3     | VL_BC_CONT   |
//! | 4     | ALIQ_PIS / ALIQ_COFINS |
//! | 5     | VL_CONT_APUR |
//!
//! `VL_CONT_APUR = VL_BC_CONT × (alíquota / 100)`, rounded half-up at the cent.

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::RuleError;
use crate::numeric::{format_field_decimal, parse_field_decimal, round_currency};
use crate::record::EfdRecord;

use super::{check_writable, require_field, write_if_changed, ChangedFields, EfdRule};

const IDX_BC: usize = 3;
const IDX_ALIQ: usize = 4;
const IDX_CONT: usize = 5;

fn recompute_contribution(record: &mut EfdRecord) -> Result<ChangedFields, RuleError> {
    let base = parse_field_decimal(IDX_BC, require_field(record, IDX_BC)?)?;
    let rate = parse_field_decimal(IDX_ALIQ, require_field(record, IDX_ALIQ)?)?;
    check_writable(record, &[IDX_CONT])?;

    let contribution = round_currency(base * rate / Decimal::ONE_HUNDRED);

    let mut changed = ChangedFields::new();
    write_if_changed(
        record,
        IDX_CONT,
        format_field_decimal(contribution),
        &mut changed,
    );
    debug!(
        record_type = record.record_type(),
        %contribution,
        changed = !changed.is_empty(),
        "contribution recomputed"
    );
    Ok(changed)
}

/// Recomputes `VL_CONT_APUR` on M210 from base and PIS rate.
pub struct PisContribution;

impl EfdRule for PisContribution {
    fn record_type(&self) -> &'static str {
        "M210"
    }

    fn name(&self) -> &'static str {
        "Calcular Contribuição PIS (M210)"
    }

    fn description(&self) -> &'static str {
        "Calcula o Valor da Contribuição Apurada (VL_CONT_APUR) a partir da Base de Cálculo e da Alíquota."
    }

    fn apply(
        &self,
        record: &mut EfdRecord,
        _all_records: &[EfdRecord],
    ) -> Result<ChangedFields, RuleError> {
        recompute_contribution(record)
    }
}

/// Recomputes `VL_CONT_APUR` on M610 from base and COFINS rate.
pub struct CofinsContribution;

impl EfdRule for CofinsContribution {
    fn record_type(&self) -> &'static str {
        "M610"
    }

    fn name(&self) -> &'static str {
        "Calcular Contribuição COFINS (M610)"
    }

    fn description(&self) -> &'static str {
        "Calcula o Valor da Contribuição Apurada (VL_CONT_APUR) a partir da Base de Cálculo e da Alíquota."
    }

    fn apply(
        &self,
        record: &mut EfdRecord,
        _all_records: &[EfdRecord],
    ) -> Result<ChangedFields, RuleError> {
        recompute_contribution(record)
    }
}

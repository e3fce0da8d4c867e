//! Entity-level contradictions inside a single profile: admissions against
//! denials, and financial figures that drift over time.

use std::collections::BTreeMap;

use super::{ContradictionDetector, DetectionContext};
use crate::error::Result;
use crate::index::statements_contradict;
use crate::model::{ClaimCategory, Contradiction, ContradictionType, EntityProfile, FinancialFigure, LegalTrigger};
use crate::utils::excerpt;
use crate::utils::text::word_overlap;

const ADMISSION_DENIAL_SEVERITY: i64 = 7;

pub struct EntityDetector;

impl EntityDetector {
    fn admission_denial(ctx: &DetectionContext<'_>, profile: &EntityProfile) -> Result<Vec<Contradiction>> {
        let mut found = Vec::new();
        let claims = &profile.claims;

        for (i, a) in claims.iter().enumerate() {
            for b in &claims[i + 1..] {
                let opposed = matches!(
                    (a.category, b.category),
                    (ClaimCategory::Admission, ClaimCategory::Denial) | (ClaimCategory::Denial, ClaimCategory::Admission)
                );
                if !opposed || !statements_contradict(&a.text, &b.text) {
                    continue;
                }

                let confidence = 0.5 + 0.5 * word_overlap(&a.text, &b.text);
                let contradiction = Contradiction::new(
                    ContradictionType::Entity,
                    ADMISSION_DENIAL_SEVERITY,
                    confidence,
                    ctx.statement_ref(&a.statement_id)?,
                    ctx.statement_ref(&b.statement_id)?,
                    format!(
                        "{} both admits and denies: \"{}\" / \"{}\"",
                        profile.display_name,
                        excerpt(&a.text, 80),
                        excerpt(&b.text, 80)
                    ),
                )?;
                found.push(contradiction.with_trigger(LegalTrigger::Concealment));
            }
        }
        Ok(found)
    }

    fn financial_drift(ctx: &DetectionContext<'_>, profile: &EntityProfile) -> Result<Vec<Contradiction>> {
        let thresholds = &ctx.config.financial;

        let mut groups: BTreeMap<(&str, &str), Vec<&FinancialFigure>> = BTreeMap::new();
        for figure in &profile.financial_figures {
            if figure.context.is_empty() {
                continue;
            }
            groups.entry((figure.currency.as_str(), figure.context.as_str())).or_default().push(figure);
        }

        let mut found = Vec::new();
        for ((currency, context), mut figures) in groups {
            // undated figures sort last; stable, so ties keep statement order
            figures.sort_by_key(|f| (f.timestamp.is_none(), f.timestamp));

            for pair in figures.windows(2) {
                let (prev, cur) = (pair[0], pair[1]);
                if prev.statement_id == cur.statement_id || prev.amount <= 0.0 {
                    continue;
                }

                let change = (cur.amount - prev.amount).abs() / prev.amount;
                let severity = if change > thresholds.severe_drift {
                    9
                } else if change > thresholds.major_drift {
                    7
                } else if change > thresholds.minor_drift {
                    5
                } else {
                    continue;
                };

                let contradiction = Contradiction::new(
                    ContradictionType::Financial,
                    severity,
                    (0.5 + 0.5 * change.min(1.0)) as f32,
                    ctx.statement_ref(&prev.statement_id)?,
                    ctx.statement_ref(&cur.statement_id)?,
                    format!(
                        "{} reported {:.2} then {:.2} {} for \"{}\" ({:.0}% change)",
                        profile.display_name,
                        prev.amount,
                        cur.amount,
                        currency,
                        context,
                        change * 100.0
                    ),
                )?;
                found.push(contradiction.with_trigger(LegalTrigger::FinancialMisrepresentation));
            }
        }
        Ok(found)
    }
}

impl ContradictionDetector for EntityDetector {
    fn name(&self) -> &'static str {
        "entity"
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Result<Vec<Contradiction>> {
        let mut found = Vec::new();
        for profile in ctx.profiles.values() {
            found.extend(Self::admission_denial(ctx, profile)?);
        }
        for profile in ctx.profiles.values() {
            found.extend(Self::financial_drift(ctx, profile)?);
        }
        Ok(found)
    }
}

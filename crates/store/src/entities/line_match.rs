//! Statement line match entity.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use steward_core::reconcile::MatchConfidence;
use steward_shared::{LineMatchId, StatementLineId, TransactionId};

use crate::version::Entity;

/// Links a statement line to a ledger transaction for some amount.
///
/// Several matches may cover one line (partial matching); their amounts
/// may never exceed the line's absolute amount beyond the tolerance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineMatch {
    /// Logical id, stable across versions.
    pub id: LineMatchId,
    /// The covered statement line.
    pub statement_line_id: StatementLineId,
    /// The covering ledger transaction.
    pub transaction_id: TransactionId,
    /// Positive matched amount.
    pub amount: Decimal,
    /// Which pass or actor produced the match.
    pub confidence: MatchConfidence,
    /// Human-readable explanation for review.
    pub reason: String,
}

impl Entity for LineMatch {
    type Id = LineMatchId;
    const NAME: &'static str = "line match";

    fn id(&self) -> LineMatchId {
        self.id
    }
}

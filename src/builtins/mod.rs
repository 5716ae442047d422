//! Builtin function registry.
//!
//! Builtins form a closed set. Names are resolved to a [`Builtin`] once at
//! parse time. The registry is built lazily on first use and never mutated,
//! so it can be shared across threads without locking.

mod arithmetic;
mod collections;
mod delegation;
mod governance;
mod saga;
pub mod spec;
pub(crate) mod temporal;
mod time;

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::LazyLock;

use log::trace;

use crate::evaluator::EvaluationContext;
use crate::value::{UNDEFINED, Value};

pub use spec::{ArgumentSpec, BuiltinExample, BuiltinSpec};

const LOG_TARGET: &str = "constraint::builtins";

/// Language keywords that may not be used as field names alongside builtins.
pub const KEYWORDS: [&str; 6] = ["true", "false", "null", "undefined", "every", "length"];

/// Number of arguments a builtin accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    /// Inclusive range
    Range(usize, usize),
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == *n,
            Arity::Range(min, max) => (*min..=*max).contains(&count),
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "{}", n),
            Arity::Range(min, max) => write!(f, "{}..{}", min, max),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Builtin {
    BigintSum,
    BigintGte,
    BigintGt,
    BigintEq,
    BigintSub,
    BigintAdd,
    Eq,
    AllLinksSubsetAuthority,
    DelegationBudgetConserved,
    LinksTemporallyOrdered,
    LinksFormChain,
    NoEmergentInIndividual,
    AllEmergentHaveEvidence,
    ObjectKeysSubset,
    Changed,
    Previous,
    Delta,
    Len,
    TypeOf,
    IsBigintCoercible,
    UniqueValues,
    TreeBudgetConserved,
    TreeAuthorityNarrowing,
    SagaAmountConserved,
    SagaStepsSequential,
    OutcomeConsensusValid,
    MonetaryPolicySolvent,
    PermissionBoundaryActive,
    ProposalQuorumMet,
    SagaTimeoutValid,
    ProposalWeightsNormalized,
    IsAfter,
    IsBefore,
    IsBetween,
    IsStale,
    IsWithin,
    ConstraintLifecycleValid,
    ProposalExecutionValid,
    Now,
    ModelRoutingEligible,
    BasketWeightsNormalized,
    ExecutionCheckpointValid,
    AuditTrailChainValid,
}

impl Builtin {
    /// Every builtin, in registration order.
    pub const ALL: [Builtin; 43] = [
        Builtin::BigintSum,
        Builtin::BigintGte,
        Builtin::BigintGt,
        Builtin::BigintEq,
        Builtin::BigintSub,
        Builtin::BigintAdd,
        Builtin::Eq,
        Builtin::AllLinksSubsetAuthority,
        Builtin::DelegationBudgetConserved,
        Builtin::LinksTemporallyOrdered,
        Builtin::LinksFormChain,
        Builtin::NoEmergentInIndividual,
        Builtin::AllEmergentHaveEvidence,
        Builtin::ObjectKeysSubset,
        Builtin::Changed,
        Builtin::Previous,
        Builtin::Delta,
        Builtin::Len,
        Builtin::TypeOf,
        Builtin::IsBigintCoercible,
        Builtin::UniqueValues,
        Builtin::TreeBudgetConserved,
        Builtin::TreeAuthorityNarrowing,
        Builtin::SagaAmountConserved,
        Builtin::SagaStepsSequential,
        Builtin::OutcomeConsensusValid,
        Builtin::MonetaryPolicySolvent,
        Builtin::PermissionBoundaryActive,
        Builtin::ProposalQuorumMet,
        Builtin::SagaTimeoutValid,
        Builtin::ProposalWeightsNormalized,
        Builtin::IsAfter,
        Builtin::IsBefore,
        Builtin::IsBetween,
        Builtin::IsStale,
        Builtin::IsWithin,
        Builtin::ConstraintLifecycleValid,
        Builtin::ProposalExecutionValid,
        Builtin::Now,
        Builtin::ModelRoutingEligible,
        Builtin::BasketWeightsNormalized,
        Builtin::ExecutionCheckpointValid,
        Builtin::AuditTrailChainValid,
    ];

    pub fn name(&self) -> &'static str {
        use Builtin::*;
        match self {
            BigintSum => "bigint_sum",
            BigintGte => "bigint_gte",
            BigintGt => "bigint_gt",
            BigintEq => "bigint_eq",
            BigintSub => "bigint_sub",
            BigintAdd => "bigint_add",
            Eq => "eq",
            AllLinksSubsetAuthority => "all_links_subset_authority",
            DelegationBudgetConserved => "delegation_budget_conserved",
            LinksTemporallyOrdered => "links_temporally_ordered",
            LinksFormChain => "links_form_chain",
            NoEmergentInIndividual => "no_emergent_in_individual",
            AllEmergentHaveEvidence => "all_emergent_have_evidence",
            ObjectKeysSubset => "object_keys_subset",
            Changed => "changed",
            Previous => "previous",
            Delta => "delta",
            Len => "len",
            TypeOf => "type_of",
            IsBigintCoercible => "is_bigint_coercible",
            UniqueValues => "unique_values",
            TreeBudgetConserved => "tree_budget_conserved",
            TreeAuthorityNarrowing => "tree_authority_narrowing",
            SagaAmountConserved => "saga_amount_conserved",
            SagaStepsSequential => "saga_steps_sequential",
            OutcomeConsensusValid => "outcome_consensus_valid",
            MonetaryPolicySolvent => "monetary_policy_solvent",
            PermissionBoundaryActive => "permission_boundary_active",
            ProposalQuorumMet => "proposal_quorum_met",
            SagaTimeoutValid => "saga_timeout_valid",
            ProposalWeightsNormalized => "proposal_weights_normalized",
            IsAfter => "is_after",
            IsBefore => "is_before",
            IsBetween => "is_between",
            IsStale => "is_stale",
            IsWithin => "is_within",
            ConstraintLifecycleValid => "constraint_lifecycle_valid",
            ProposalExecutionValid => "proposal_execution_valid",
            Now => "now",
            ModelRoutingEligible => "model_routing_eligible",
            BasketWeightsNormalized => "basket_weights_normalized",
            ExecutionCheckpointValid => "execution_checkpoint_valid",
            AuditTrailChainValid => "audit_trail_chain_valid",
        }
    }

    pub fn arity(&self) -> Arity {
        use Builtin::*;
        match self {
            Now => Arity::Exact(0),
            BigintSum => Arity::Range(1, 2),
            AllLinksSubsetAuthority
            | DelegationBudgetConserved
            | LinksTemporallyOrdered
            | LinksFormChain
            | Changed
            | Previous
            | Delta
            | Len
            | TypeOf
            | IsBigintCoercible
            | TreeBudgetConserved
            | TreeAuthorityNarrowing
            | SagaAmountConserved
            | SagaStepsSequential
            | OutcomeConsensusValid
            | PermissionBoundaryActive
            | ProposalQuorumMet
            | SagaTimeoutValid
            | ProposalWeightsNormalized
            | ConstraintLifecycleValid
            | ProposalExecutionValid
            | BasketWeightsNormalized
            | ExecutionCheckpointValid
            | AuditTrailChainValid => Arity::Exact(1),
            BigintGte
            | BigintGt
            | BigintEq
            | BigintSub
            | BigintAdd
            | Eq
            | NoEmergentInIndividual
            | AllEmergentHaveEvidence
            | ObjectKeysSubset
            | UniqueValues
            | MonetaryPolicySolvent
            | IsAfter
            | IsBefore
            | ModelRoutingEligible => Arity::Exact(2),
            IsBetween | IsStale | IsWithin => Arity::Exact(3),
        }
    }

    /// Temporal builtins take a field path and read the `_previous` companion record.
    pub fn is_temporal(&self) -> bool {
        matches!(self, Builtin::Changed | Builtin::Previous | Builtin::Delta)
    }

    /// Looks a builtin up by its source name.
    pub fn from_name(name: &str) -> Option<Builtin> {
        REGISTRY.get(name).copied()
    }

    pub fn spec(&self) -> &'static BuiltinSpec {
        spec::spec_for(*self)
    }

    /// Invokes the builtin on already-evaluated arguments.
    ///
    /// Total: malformed or missing inputs produce a definite value, never a panic.
    /// Temporal builtins called this way see no previous state; the evaluator
    /// resolves their `_previous` companion itself.
    pub fn call(&self, args: &[Value], context: &EvaluationContext) -> Value {
        trace!(target: LOG_TARGET, "call {} with {} args", self.name(), args.len());
        let a = arg(args, 0);
        let b = arg(args, 1);
        let c = arg(args, 2);

        use Builtin::*;
        match self {
            BigintSum => arithmetic::bigint_sum(args),
            BigintGte => arithmetic::bigint_gte(a, b).into(),
            BigintGt => arithmetic::bigint_gt(a, b).into(),
            BigintEq => arithmetic::bigint_eq(a, b).into(),
            BigintSub => arithmetic::bigint_sub(a, b),
            BigintAdd => arithmetic::bigint_add(a, b),
            IsBigintCoercible => arithmetic::is_bigint_coercible(a).into(),
            Eq => a.strict_eq(b).into(),
            Len => collections::len(a),
            TypeOf => Value::String(a.type_name().to_string()),
            UniqueValues => collections::unique_values(a, b).into(),
            ObjectKeysSubset => collections::object_keys_subset(a, b).into(),
            NoEmergentInIndividual => collections::no_emergent_in_individual(a, b).into(),
            AllEmergentHaveEvidence => collections::all_emergent_have_evidence(a, b).into(),
            AllLinksSubsetAuthority => delegation::all_links_subset_authority(a).into(),
            DelegationBudgetConserved => delegation::delegation_budget_conserved(a).into(),
            LinksTemporallyOrdered => delegation::links_temporally_ordered(a).into(),
            LinksFormChain => delegation::links_form_chain(a).into(),
            TreeBudgetConserved => delegation::tree_budget_conserved(a).into(),
            TreeAuthorityNarrowing => delegation::tree_authority_narrowing(a).into(),
            Changed => temporal::changed(a, None),
            Previous => temporal::previous(None),
            Delta => temporal::delta(a, None),
            SagaAmountConserved => saga::saga_amount_conserved(a).into(),
            SagaStepsSequential => saga::saga_steps_sequential(a).into(),
            SagaTimeoutValid => saga::saga_timeout_valid(a).into(),
            OutcomeConsensusValid => governance::outcome_consensus_valid(a).into(),
            MonetaryPolicySolvent => governance::monetary_policy_solvent(a, b).into(),
            PermissionBoundaryActive => governance::permission_boundary_active(a).into(),
            ProposalQuorumMet => governance::proposal_quorum_met(a).into(),
            ProposalWeightsNormalized => governance::proposal_weights_normalized(a).into(),
            ConstraintLifecycleValid => governance::constraint_lifecycle_valid(a).into(),
            ProposalExecutionValid => governance::proposal_execution_valid(a).into(),
            ModelRoutingEligible => governance::model_routing_eligible(a, b).into(),
            BasketWeightsNormalized => governance::basket_weights_normalized(a).into(),
            ExecutionCheckpointValid => governance::execution_checkpoint_valid(a).into(),
            AuditTrailChainValid => governance::audit_trail_chain_valid(a).into(),
            IsAfter => time::is_after(a, b).into(),
            IsBefore => time::is_before(a, b).into(),
            IsBetween => time::is_between(a, b, c).into(),
            IsStale => time::is_stale(a, b, c).into(),
            IsWithin => time::is_within(a, b, c).into(),
            Now => time::now(context),
        }
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn arg(args: &[Value], index: usize) -> &Value {
    args.get(index).unwrap_or(&UNDEFINED)
}

static REGISTRY: LazyLock<HashMap<&'static str, Builtin>> =
    LazyLock::new(|| Builtin::ALL.iter().map(|b| (b.name(), *b)).collect());

/// Builtin names plus language keywords. Schema authors must not use these as field names.
pub static RESERVED_EVALUATOR_NAMES: LazyLock<BTreeSet<&'static str>> = LazyLock::new(|| {
    Builtin::ALL
        .iter()
        .map(|b| b.name())
        .chain(KEYWORDS)
        .collect()
});

/// Names of every registered builtin, in registration order.
pub fn builtin_names() -> impl Iterator<Item = &'static str> {
    Builtin::ALL.iter().map(|b| b.name())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_round_trips_names() {
        for builtin in Builtin::ALL {
            assert_eq!(Builtin::from_name(builtin.name()), Some(builtin));
        }
        assert_eq!(Builtin::from_name("my_custom_field"), None);
    }

    #[test]
    fn test_reserved_names() {
        assert_eq!(RESERVED_EVALUATOR_NAMES.len(), Builtin::ALL.len() + KEYWORDS.len());
        assert!(RESERVED_EVALUATOR_NAMES.contains("undefined"));
        assert!(!RESERVED_EVALUATOR_NAMES.contains("expires_at"));
    }

    #[test]
    fn test_arity() {
        assert!(Builtin::BigintSum.arity().accepts(1));
        assert!(Builtin::BigintSum.arity().accepts(2));
        assert!(!Builtin::BigintSum.arity().accepts(3));
        assert!(Builtin::Now.arity().accepts(0));
    }
}

use std::collections::BTreeMap;

use crate::error::Skipped;
use crate::source::LineEnding;
use crate::rules::{
    ArgumentRule, ClassProcRule, ConnectionRule, FieldRule, ImplementsRule, InputFieldRule,
    NameRule, PossibleTypesRule, PropertyToMethodRule, ResolveProcRule, Rule, RuleKind,
    TypeDefinitionRule,
};

/// Settings for an [`Upgrader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradeOptions {
    /// Namespace of the base classes, e.g. `Types` for `Types::BaseObject`.
    /// Empty means unqualified base classes.
    pub base_namespace: String,
    /// Rules left out of the pipeline.
    pub disabled_rules: Vec<RuleKind>,
}

impl Default for UpgradeOptions {
    fn default() -> Self {
        Self {
            base_namespace: "Types".to_string(),
            disabled_rules: Vec::new(),
        }
    }
}

/// The result of one upgrade with per-rule bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpgradeReport {
    pub output: String,
    /// Rewrite counts for every rule that changed something.
    pub applied: BTreeMap<RuleKind, usize>,
    /// Constructs left untouched. Line numbers refer to the text as the
    /// skipping rule saw it.
    pub skipped: Vec<Skipped>,
}

impl UpgradeReport {
    pub fn total_rewrites(&self) -> usize {
        self.applied.values().sum()
    }
}

/// Applies the fixed rule sequence once, feeding each rule's output to the
/// next.
///
/// An `Upgrader` holds no per-call state and can be shared across threads.
pub struct Upgrader {
    rules: Vec<Box<dyn Rule>>,
}

impl Upgrader {
    /// Creates an upgrader with the default options.
    pub fn new() -> Self {
        Self::with_options(UpgradeOptions::default())
    }

    pub fn with_options(options: UpgradeOptions) -> Self {
        let all: Vec<Box<dyn Rule>> = vec![
            Box::new(TypeDefinitionRule::new(options.base_namespace.clone())),
            Box::new(NameRule),
            Box::new(FieldRule),
            Box::new(ArgumentRule),
            Box::new(InputFieldRule),
            Box::new(ConnectionRule),
            Box::new(PropertyToMethodRule),
            Box::new(ResolveProcRule),
            Box::new(ImplementsRule),
            Box::new(PossibleTypesRule),
            Box::new(ClassProcRule),
        ];

        let rules = all
            .into_iter()
            .filter(|rule| !options.disabled_rules.contains(&rule.kind()))
            .collect();
        Self { rules }
    }

    /// The enabled rules, in pipeline order.
    pub fn rules(&self) -> Vec<RuleKind> {
        self.rules.iter().map(|rule| rule.kind()).collect()
    }

    pub fn upgrade(&self, source: &str) -> String {
        self.upgrade_with_report(source).output
    }

    /// Runs every enabled rule over `source`.
    ///
    /// Rules see `\n` line endings. A text written entirely with `\r\n` gets
    /// `\r\n` back on every line, rewritten or not.
    pub fn upgrade_with_report(&self, source: &str) -> UpgradeReport {
        let ending = LineEnding::detect(source);
        let mut report = UpgradeReport {
            output: ending.normalize(source),
            ..UpgradeReport::default()
        };

        for rule in &self.rules {
            let outcome = rule.apply(&report.output);
            let kind = rule.kind();

            for skip in &outcome.skipped {
                tracing::debug!(rule = %kind, line = skip.line, reason = %skip.reason, "construct skipped");
            }
            if outcome.rewrites > 0 {
                tracing::debug!(rule = %kind, rewrites = outcome.rewrites, "rule applied");
                report.applied.insert(kind, outcome.rewrites);
            }

            report.output = outcome.text;
            report.skipped.extend(outcome.skipped);
        }

        report.output = ending.restore(report.output);
        report
    }
}

impl Default for Upgrader {
    fn default() -> Self {
        Self::new()
    }
}

/// Upgrades `source` with the default options.
///
/// Total over any input: text without legacy constructs comes back unchanged.
pub fn upgrade(source: &str) -> String {
    Upgrader::new().upgrade(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pipeline_order() {
        assert_eq!(Upgrader::new().rules(), RuleKind::ALL.to_vec());
    }

    #[test]
    fn disabled_rules_are_left_out() {
        let upgrader = Upgrader::with_options(UpgradeOptions {
            disabled_rules: vec![RuleKind::Name, RuleKind::ClassProc],
            ..UpgradeOptions::default()
        });
        let rules = upgrader.rules();
        assert_eq!(rules.len(), RuleKind::ALL.len() - 2);
        assert!(!rules.contains(&RuleKind::Name));
    }

    #[test]
    fn report_counts_rewrites() {
        let src = "A = GraphQL::ObjectType.define do\n  field :a, types.Int\n  field :b, types.Int\nend";
        let report = Upgrader::new().upgrade_with_report(src);
        assert_eq!(report.applied.get(&RuleKind::TypeDefinition), Some(&1));
        assert_eq!(report.applied.get(&RuleKind::Field), Some(&2));
        assert_eq!(report.total_rewrites(), 3);
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn report_collects_skips() {
        let report = Upgrader::new().upgrade_with_report("field :a, some_helper(1)");
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].rule, RuleKind::Field);
        assert!(report.applied.is_empty());
    }

    #[test]
    fn crlf_input_keeps_crlf_on_rewritten_lines() {
        let src = "A = GraphQL::ObjectType.define do\r\n  field :a, types.Int\r\nend\r\n";
        let out = upgrade(src);
        assert_eq!(
            out,
            "class A < Types::BaseObject\r\n  field :a, Integer, null: true\r\nend\r\n"
        );
        assert_eq!(upgrade(&out), out);
    }

    #[test]
    fn crlf_resolver_method_lines() {
        let src = "field :n, types.Int do\r\n  resolve ->(obj, args, ctx) { obj.n }\r\nend\r\n";
        assert_eq!(
            upgrade(src),
            "field :n, Integer, null: true\r\n\r\ndef n\r\n  object.n\r\nend\r\n"
        );
    }

    #[test]
    fn upgrader_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Upgrader>();
    }

    #[test]
    fn custom_base_namespace() {
        let upgrader = Upgrader::with_options(UpgradeOptions {
            base_namespace: "Graph::Types".into(),
            ..UpgradeOptions::default()
        });
        assert_eq!(
            upgrader.upgrade("A = GraphQL::UnionType.define do\nend"),
            "class A < Graph::Types::BaseUnion\nend"
        );
    }
}

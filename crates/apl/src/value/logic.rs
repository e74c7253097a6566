//! Constants, boolean logic, comparisons and encounter clock values.

use std::fmt;
use std::time::Duration;

use sim_core::Simulation;

use super::{AplValue, BoolNode, FloatNode, IntNode, ValueNode};
use crate::config::{CompareOp, ConstValue, ValueConfig};
use crate::context::CompileContext;

// ============================================================================
// Constants
// ============================================================================

pub struct Const<T> {
    value: T,
    label: String,
}

impl<T: Copy + Send + Sync> ValueNode<T> for Const<T> {
    fn evaluate(&self, _sim: &Simulation) -> T {
        self.value
    }
}

impl<T> fmt::Display for Const<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

pub(crate) fn new_const(ctx: &mut CompileContext<'_>, config: &ValueConfig) -> Option<AplValue> {
    let ValueConfig::Const(value) = config else {
        return None;
    };
    let value = match *value {
        ConstValue::Bool(value) => AplValue::bool(Const {
            value,
            label: value.to_string(),
        }),
        ConstValue::Int(value) => AplValue::int(Const {
            value,
            label: value.to_string(),
        }),
        ConstValue::Float(value) => AplValue::float(Const {
            value,
            label: value.to_string(),
        }),
        ConstValue::Duration(secs) => match Duration::try_from_secs_f64(secs) {
            Ok(value) => AplValue::duration(Const {
                value,
                label: format!("{secs}s"),
            }),
            Err(_) => {
                ctx.warn(format!("Invalid duration constant {secs}"));
                return None;
            }
        },
    };
    Some(value)
}

// ============================================================================
// Boolean logic
// ============================================================================

/// True when every operand is true; stops at the first false one.
pub struct And {
    vals: Vec<BoolNode>,
}

impl ValueNode<bool> for And {
    fn evaluate(&self, sim: &Simulation) -> bool {
        self.vals.iter().all(|v| v.evaluate(sim))
    }
}

impl fmt::Display for And {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        join(f, &self.vals, " && ")
    }
}

/// True when any operand is true; stops at the first true one.
pub struct Or {
    vals: Vec<BoolNode>,
}

impl ValueNode<bool> for Or {
    fn evaluate(&self, sim: &Simulation) -> bool {
        self.vals.iter().any(|v| v.evaluate(sim))
    }
}

impl fmt::Display for Or {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        join(f, &self.vals, " || ")
    }
}

fn join(f: &mut fmt::Formatter<'_>, vals: &[BoolNode], separator: &str) -> fmt::Result {
    for (i, val) in vals.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "({val})")?;
    }
    Ok(())
}

pub struct Not {
    val: BoolNode,
}

impl ValueNode<bool> for Not {
    fn evaluate(&self, sim: &Simulation) -> bool {
        !self.val.evaluate(sim)
    }
}

impl fmt::Display for Not {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Not({})", self.val)
    }
}

/// Compiles every operand so each failure is reported.
fn bool_operands(ctx: &mut CompileContext<'_>, configs: &[ValueConfig]) -> Vec<Option<BoolNode>> {
    configs.iter().map(|config| ctx.bool_value(config)).collect()
}

/// An inert operand makes the whole conjunction inert, so a broken guard
/// never lets its entry fire.
pub(crate) fn new_and(ctx: &mut CompileContext<'_>, config: &ValueConfig) -> Option<AplValue> {
    let ValueConfig::And(configs) = config else {
        return None;
    };
    if configs.is_empty() {
        ctx.warn("And has no operands");
        return None;
    }
    let vals = bool_operands(ctx, configs)
        .into_iter()
        .collect::<Option<Vec<_>>>()?;
    Some(AplValue::bool(And { vals }))
}

/// Inert operands are dropped; they could only ever read as false.
pub(crate) fn new_or(ctx: &mut CompileContext<'_>, config: &ValueConfig) -> Option<AplValue> {
    let ValueConfig::Or(configs) = config else {
        return None;
    };
    let vals: Vec<_> = bool_operands(ctx, configs).into_iter().flatten().collect();
    if vals.is_empty() {
        ctx.warn("Or has no valid operands");
        return None;
    }
    Some(AplValue::bool(Or { vals }))
}

pub(crate) fn new_not(ctx: &mut CompileContext<'_>, config: &ValueConfig) -> Option<AplValue> {
    let ValueConfig::Not(inner) = config else {
        return None;
    };
    let val = ctx.bool_value(inner)?;
    Some(AplValue::bool(Not { val }))
}

// ============================================================================
// Comparison
// ============================================================================

pub struct Compare<T> {
    op: CompareOp,
    lhs: Box<dyn ValueNode<T>>,
    rhs: Box<dyn ValueNode<T>>,
}

impl<T: PartialOrd + 'static> ValueNode<bool> for Compare<T> {
    fn evaluate(&self, sim: &Simulation) -> bool {
        self.op.compare(self.lhs.evaluate(sim), self.rhs.evaluate(sim))
    }
}

impl<T> fmt::Display for Compare<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.lhs, self.op, self.rhs)
    }
}

/// Integer operand read as a float.
struct IntAsFloat(IntNode);

impl ValueNode<f64> for IntAsFloat {
    fn evaluate(&self, sim: &Simulation) -> f64 {
        f64::from(self.0.evaluate(sim))
    }
}

impl fmt::Display for IntAsFloat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

fn compare<T: PartialOrd + 'static>(
    op: CompareOp,
    lhs: Box<dyn ValueNode<T>>,
    rhs: Box<dyn ValueNode<T>>,
) -> AplValue {
    AplValue::bool(Compare { op, lhs, rhs })
}

pub(crate) fn new_cmp(ctx: &mut CompileContext<'_>, config: &ValueConfig) -> Option<AplValue> {
    let ValueConfig::Cmp { op, lhs, rhs } = config else {
        return None;
    };
    let op = *op;
    let lhs = ctx.value(lhs)?;
    let rhs = ctx.value(rhs)?;

    let value = match (lhs, rhs) {
        (AplValue::Bool(l), AplValue::Bool(r)) => compare(op, l, r),
        (AplValue::Int(l), AplValue::Int(r)) => compare(op, l, r),
        (AplValue::Float(l), AplValue::Float(r)) => compare(op, l, r),
        (AplValue::Duration(l), AplValue::Duration(r)) => compare(op, l, r),
        (AplValue::Int(l), AplValue::Float(r)) => {
            let l: FloatNode = Box::new(IntAsFloat(l));
            compare(op, l, r)
        }
        (AplValue::Float(l), AplValue::Int(r)) => {
            let r: FloatNode = Box::new(IntAsFloat(r));
            compare(op, l, r)
        }
        (l, r) => {
            let (lt, rt) = (l.value_type(), r.value_type());
            ctx.warn(format!("Cannot compare {lt} value `{l}` with {rt} value `{r}`"));
            return None;
        }
    };
    Some(value)
}

// ============================================================================
// Encounter clock
// ============================================================================

pub struct CurrentTime;

impl ValueNode<Duration> for CurrentTime {
    fn evaluate(&self, sim: &Simulation) -> Duration {
        sim.current_time().elapsed()
    }
}

impl fmt::Display for CurrentTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Current Time")
    }
}

pub struct RemainingTime;

impl ValueNode<Duration> for RemainingTime {
    fn evaluate(&self, sim: &Simulation) -> Duration {
        sim.remaining_time()
    }
}

impl fmt::Display for RemainingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Remaining Time")
    }
}

/// Enabled targets in the encounter roster.
pub struct NumberTargets;

impl ValueNode<i32> for NumberTargets {
    fn evaluate(&self, sim: &Simulation) -> i32 {
        i32::try_from(sim.enabled_target_count()).unwrap_or(i32::MAX)
    }
}

impl fmt::Display for NumberTargets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Number of Targets")
    }
}

pub(crate) fn new_current_time(_: &mut CompileContext<'_>, _: &ValueConfig) -> Option<AplValue> {
    Some(AplValue::duration(CurrentTime))
}

pub(crate) fn new_remaining_time(_: &mut CompileContext<'_>, _: &ValueConfig) -> Option<AplValue> {
    Some(AplValue::duration(RemainingTime))
}

pub(crate) fn new_number_targets(_: &mut CompileContext<'_>, _: &ValueConfig) -> Option<AplValue> {
    Some(AplValue::int(NumberTargets))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ValueCatalog;
    use crate::diagnostics::Diagnostics;
    use crate::value::Evaluated;
    use sim_core::{SimConfig, UnitId, UnitStats};

    fn int(v: i32) -> ValueConfig {
        ValueConfig::Const(ConstValue::Int(v))
    }

    fn float(v: f64) -> ValueConfig {
        ValueConfig::Const(ConstValue::Float(v))
    }

    fn boolean(v: bool) -> ValueConfig {
        ValueConfig::Const(ConstValue::Bool(v))
    }

    fn cmp(op: CompareOp, lhs: ValueConfig, rhs: ValueConfig) -> ValueConfig {
        ValueConfig::Cmp {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    fn setup() -> (Simulation, UnitId) {
        let mut sim = Simulation::new(SimConfig::default(), 0);
        sim.add_target("A", UnitStats::default()).unwrap();
        sim.add_target("B", UnitStats::default()).unwrap();
        let player = sim.add_player("P", UnitStats::default());
        (sim, player)
    }

    fn build(
        sim: &Simulation,
        caster: UnitId,
        config: &ValueConfig,
    ) -> (Option<AplValue>, Diagnostics) {
        let catalog = ValueCatalog::standard();
        let mut diagnostics = Diagnostics::new();
        let value = {
            let mut ctx = CompileContext::new(sim, caster, &catalog, &mut diagnostics);
            ctx.value(config)
        };
        (value, diagnostics)
    }

    #[test]
    fn int_float_comparison_promotes() {
        let (sim, player) = setup();
        let (value, diagnostics) = build(&sim, player, &cmp(CompareOp::Lt, int(1), float(1.5)));
        assert!(diagnostics.is_empty());
        assert_eq!(value.unwrap().evaluate(&sim), Evaluated::Bool(true));
    }

    #[test]
    fn mixed_kinds_are_rejected() {
        let (sim, player) = setup();
        let (value, diagnostics) = build(
            &sim,
            player,
            &cmp(CompareOp::Eq, ValueConfig::CurrentTime, int(3)),
        );
        assert!(value.is_none());
        assert_eq!(diagnostics.warnings().count(), 1);
    }

    #[test]
    fn and_with_inert_operand_is_inert() {
        let (sim, player) = setup();
        let config = ValueConfig::And(vec![boolean(true), int(4), boolean(true)]);
        let (value, diagnostics) = build(&sim, player, &config);

        assert!(value.is_none());
        assert_eq!(diagnostics.warnings().count(), 1);
    }

    #[test]
    fn or_drops_non_boolean_operands() {
        let (sim, player) = setup();
        let config = ValueConfig::Or(vec![boolean(false), int(4), boolean(true)]);
        let (value, diagnostics) = build(&sim, player, &config);

        let value = value.unwrap();
        assert_eq!(diagnostics.warnings().count(), 1);
        assert_eq!(value.to_string(), "(false) || (true)");
        assert_eq!(value.evaluate(&sim), Evaluated::Bool(true));
    }

    #[test]
    fn empty_or_is_inert() {
        let (sim, player) = setup();
        let (value, diagnostics) = build(&sim, player, &ValueConfig::Or(vec![int(1)]));
        assert!(value.is_none());
        assert_eq!(diagnostics.warnings().count(), 2);
    }

    #[test]
    fn not_and_or_evaluate() {
        let (sim, player) = setup();
        let config = ValueConfig::Or(vec![
            boolean(false),
            ValueConfig::Not(Box::new(boolean(false))),
        ]);
        let (value, _) = build(&sim, player, &config);
        assert_eq!(value.unwrap().evaluate(&sim), Evaluated::Bool(true));
    }

    #[test]
    fn clock_values_follow_the_simulation() {
        let (mut sim, player) = setup();
        sim.advance_by(Duration::from_secs(30));

        let (now, _) = build(&sim, player, &ValueConfig::CurrentTime);
        let (left, _) = build(&sim, player, &ValueConfig::RemainingTime);
        assert_eq!(
            now.unwrap().evaluate(&sim),
            Evaluated::Duration(Duration::from_secs(30))
        );
        assert_eq!(
            left.unwrap().evaluate(&sim),
            Evaluated::Duration(Duration::from_secs(150))
        );
    }

    #[test]
    fn number_targets_counts_enabled_only() {
        let (mut sim, player) = setup();
        let (value, _) = build(&sim, player, &ValueConfig::NumberTargets);
        let value = value.unwrap();
        assert_eq!(value.evaluate(&sim), Evaluated::Int(2));

        let first = sim.encounter().target(0).unwrap();
        sim.set_target_enabled(first, false);
        assert_eq!(value.evaluate(&sim), Evaluated::Int(1));
    }

    #[test]
    fn negative_duration_constant_warns() {
        let (sim, player) = setup();
        let (value, diagnostics) = build(
            &sim,
            player,
            &ValueConfig::Const(ConstValue::Duration(-1.0)),
        );
        assert!(value.is_none());
        assert_eq!(diagnostics.len(), 1);
    }
}

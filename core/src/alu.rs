//! The arithmetic/logic datapath and the jump-condition logic.

use crate::arith::{Add16Gate, Sub16Gate};
use crate::gate::{Connector, Gate, TieHighGate};
use crate::logic::{
    AndGate, AndNGate, Combine16Gate, NotGate, NotNGate, OrGate, OrNGate, SelectNGate, XorNGate,
};
use crate::signal::{Bus16, Signal};

/// The logic half of the ALU.
///
/// Over (`op1`, `op0`): `00 -> x & y`, `01 -> x | y`, `10 -> x ^ y`,
/// `11 -> !x`. All four results are computed every pass; the op bits only
/// steer selects.
pub struct LogicUnit {
    and: AndNGate<16>,
    or: OrNGate<16>,
    pick_and_or: SelectNGate<16>,
    xor: XorNGate<16>,
    not: NotNGate<16>,
    pick_xor_not: SelectNGate<16>,
    pick: SelectNGate<16>,
}

impl LogicUnit {
    /// Wire the logic unit between two op lines, two operand buses and an
    /// output bus.
    #[allow(clippy::similar_names)]
    #[must_use]
    pub fn new(op1: &Signal, op0: &Signal, x: &Bus16, y: &Bus16, out: &Bus16) -> Self {
        let anded = Bus16::new();
        let ored = Bus16::new();
        let and_or = Bus16::new();
        let xored = Bus16::new();
        let noted = Bus16::new();
        let xor_not = Bus16::new();

        Self {
            and: AndNGate::new(x, y, &anded),
            or: OrNGate::new(x, y, &ored),
            pick_and_or: SelectNGate::new(op0, &ored, &anded, &and_or),
            xor: XorNGate::new(x, y, &xored),
            not: NotNGate::new(x, &noted),
            pick_xor_not: SelectNGate::new(op0, &noted, &xored, &xor_not),
            pick: SelectNGate::new(op1, &xor_not, &and_or, out),
        }
    }
}

impl Gate for LogicUnit {
    fn update(&mut self) {
        self.and.update();
        self.or.update();
        self.pick_and_or.update();
        self.xor.update();
        self.not.update();
        self.pick_xor_not.update();
        self.pick.update();
    }
}

/// The arithmetic half of the ALU.
///
/// Over (`op1`, `op0`): `00 -> x + y`, `01 -> x - y`, `10 -> x + 1`,
/// `11 -> x - 1`. The literal 1 is a bus whose low line is tied high.
pub struct ArithmeticUnit {
    add_xy: Add16Gate,
    sub_xy: Sub16Gate,
    pick_xy: SelectNGate<16>,
    one: TieHighGate,
    add_x1: Add16Gate,
    sub_x1: Sub16Gate,
    pick_x1: SelectNGate<16>,
    pick: SelectNGate<16>,
}

impl ArithmeticUnit {
    /// Wire the arithmetic unit between two op lines, two operand buses
    /// and an output bus.
    #[allow(clippy::similar_names)]
    #[must_use]
    pub fn new(op1: &Signal, op0: &Signal, x: &Bus16, y: &Bus16, out: &Bus16) -> Self {
        let no_carry = Signal::new();

        let xy_sum = Bus16::new();
        let xy_diff = Bus16::new();
        let xy = Bus16::new();
        let spill_xy = Signal::new();

        let one_bus = Bus16::new();
        let x1_sum = Bus16::new();
        let x1_diff = Bus16::new();
        let x1 = Bus16::new();
        let spill_x1 = Signal::new();

        Self {
            add_xy: Add16Gate::new(x, y, &no_carry, &xy_sum, &spill_xy),
            sub_xy: Sub16Gate::new(x, y, &xy_diff),
            pick_xy: SelectNGate::new(op0, &xy_diff, &xy_sum, &xy),
            one: TieHighGate::new(&one_bus.line(0)),
            add_x1: Add16Gate::new(x, &one_bus, &no_carry, &x1_sum, &spill_x1),
            sub_x1: Sub16Gate::new(x, &one_bus, &x1_diff),
            pick_x1: SelectNGate::new(op0, &x1_diff, &x1_sum, &x1),
            pick: SelectNGate::new(op1, &x1, &xy, out),
        }
    }
}

impl Gate for ArithmeticUnit {
    fn update(&mut self) {
        self.add_xy.update();
        self.sub_xy.update();
        self.pick_xy.update();
        self.one.update();
        self.add_x1.update();
        self.sub_x1.update();
        self.pick_x1.update();
        self.pick.update();
    }
}

/// The combined ALU: operand preprocessing in front of the logic and
/// arithmetic units, with `u` choosing between them.
///
/// Preprocessing: `sw` swaps the operands (LHS becomes `y`, RHS becomes
/// `x`), then `zx` forces the LHS to all zeros. The zero source is an
/// undriven bus.
pub struct Alu {
    swap_lhs: SelectNGate<16>,
    zero_lhs: SelectNGate<16>,
    swap_rhs: SelectNGate<16>,
    logic: LogicUnit,
    arith: ArithmeticUnit,
    pick: SelectNGate<16>,
}

impl Alu {
    /// Wire the ALU between the five control lines, the two operand buses
    /// and an output bus.
    #[allow(clippy::too_many_arguments, clippy::similar_names)]
    #[must_use]
    pub fn new(
        u: &Signal,
        op1: &Signal,
        op0: &Signal,
        zx: &Signal,
        sw: &Signal,
        x: &Bus16,
        y: &Bus16,
        out: &Bus16,
    ) -> Self {
        let lhs_raw = Bus16::new();
        let zeros = Bus16::new();
        let lhs = Bus16::new();
        let rhs = Bus16::new();
        let logic_out = Bus16::new();
        let arith_out = Bus16::new();

        Self {
            swap_lhs: SelectNGate::new(sw, y, x, &lhs_raw),
            zero_lhs: SelectNGate::new(zx, &zeros, &lhs_raw, &lhs),
            swap_rhs: SelectNGate::new(sw, x, y, &rhs),
            logic: LogicUnit::new(op1, op0, &lhs, &rhs, &logic_out),
            arith: ArithmeticUnit::new(op1, op0, &lhs, &rhs, &arith_out),
            pick: SelectNGate::new(u, &arith_out, &logic_out, out),
        }
    }
}

impl Gate for Alu {
    fn update(&mut self) {
        self.swap_lhs.update();
        self.zero_lhs.update();
        self.swap_rhs.update();
        self.logic.update();
        self.arith.update();
        self.pick.update();
    }
}

/// High iff every line of the input bus is low.
pub struct IsZeroGate {
    combine: Combine16Gate,
    invert: NotGate,
}

impl IsZeroGate {
    /// Wire a zero detector between a bus and an output line.
    #[must_use]
    pub fn new(input: &Bus16, out: &Signal) -> Self {
        let any = Signal::new();

        Self {
            combine: Combine16Gate::new(input, &any),
            invert: NotGate::new(&any, out),
        }
    }
}

impl Gate for IsZeroGate {
    fn update(&mut self) {
        self.combine.update();
        self.invert.update();
    }
}

/// High iff the input bus is negative in two's complement, i.e. bit 15.
pub struct IsNegativeGate {
    tap: Connector,
}

impl IsNegativeGate {
    /// Wire a sign detector between a bus and an output line.
    #[must_use]
    pub fn new(input: &Bus16, out: &Signal) -> Self {
        Self {
            tap: Connector::new(&input.line(15), out),
        }
    }
}

impl Gate for IsNegativeGate {
    fn update(&mut self) {
        self.tap.update();
    }
}

/// The jump-condition combiner.
///
/// Raises the output iff `(lt && x < 0) || (eq && x == 0) || (gt && x > 0)`,
/// where positive is derived as neither negative nor zero. The flag
/// triplet covers the whole predicate lattice from never (`000`) to
/// always (`111`).
pub struct ConditionUnit {
    negative: IsNegativeGate,
    gate_lt: AndGate,
    zero: IsZeroGate,
    gate_eq: AndGate,
    either: OrGate,
    not_negative: NotGate,
    not_zero: NotGate,
    positive: AndGate,
    gate_gt: AndGate,
    jump: OrGate,
}

impl ConditionUnit {
    /// Wire the condition unit between the three flag lines, the result
    /// bus and the jump line.
    #[must_use]
    pub fn new(lt: &Signal, eq: &Signal, gt: &Signal, x: &Bus16, out: &Signal) -> Self {
        let is_negative = Signal::new();
        let lt_hit = Signal::new();
        let is_zero = Signal::new();
        let eq_hit = Signal::new();
        let lt_eq_hit = Signal::new();
        let non_negative = Signal::new();
        let non_zero = Signal::new();
        let is_positive = Signal::new();
        let gt_hit = Signal::new();

        Self {
            negative: IsNegativeGate::new(x, &is_negative),
            gate_lt: AndGate::new(lt, &is_negative, &lt_hit),
            zero: IsZeroGate::new(x, &is_zero),
            gate_eq: AndGate::new(eq, &is_zero, &eq_hit),
            either: OrGate::new(&lt_hit, &eq_hit, &lt_eq_hit),
            not_negative: NotGate::new(&is_negative, &non_negative),
            not_zero: NotGate::new(&is_zero, &non_zero),
            positive: AndGate::new(&non_negative, &non_zero, &is_positive),
            gate_gt: AndGate::new(gt, &is_positive, &gt_hit),
            jump: OrGate::new(&lt_eq_hit, &gt_hit, out),
        }
    }
}

impl Gate for ConditionUnit {
    fn update(&mut self) {
        self.negative.update();
        self.gate_lt.update();
        self.zero.update();
        self.gate_eq.update();
        self.either.update();
        self.not_negative.update();
        self.not_zero.update();
        self.positive.update();
        self.gate_gt.update();
        self.jump.update();
    }
}

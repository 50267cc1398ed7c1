//! Adders: half, full, and the 16-bit ripple-carry family.

use crate::gate::{Gate, TieHighGate};
use crate::logic::{AndGate, NotNGate, OrGate, XorGate};
use crate::signal::{Bus16, Signal};

/// Half adder: `h = a && b`, `l = a ^ b`.
pub struct HalfAdderGate {
    carry: AndGate,
    sum: XorGate,
}

impl HalfAdderGate {
    /// Wire a half adder; `h` is the carry line, `l` the sum line.
    #[must_use]
    pub fn new(a: &Signal, b: &Signal, h: &Signal, l: &Signal) -> Self {
        Self {
            carry: AndGate::new(a, b, h),
            sum: XorGate::new(a, b, l),
        }
    }
}

impl Gate for HalfAdderGate {
    fn update(&mut self) {
        self.carry.update();
        self.sum.update();
    }
}

/// Full adder: two half adders with their carries merged.
pub struct FullAdderGate {
    first: HalfAdderGate,
    second: HalfAdderGate,
    merge: OrGate,
}

impl FullAdderGate {
    /// Wire a full adder; `h` is the carry line, `l` the sum line.
    #[must_use]
    pub fn new(a: &Signal, b: &Signal, c: &Signal, h: &Signal, l: &Signal) -> Self {
        let h1 = Signal::new();
        let l1 = Signal::new();
        let h2 = Signal::new();

        Self {
            first: HalfAdderGate::new(a, b, &h1, &l1),
            second: HalfAdderGate::new(&l1, c, &h2, l),
            merge: OrGate::new(&h1, &h2, h),
        }
    }
}

impl Gate for FullAdderGate {
    fn update(&mut self) {
        self.first.update();
        self.second.update();
        self.merge.update();
    }
}

/// 16-bit ripple-carry adder: `sum = (a + b + c_in) mod 2^16`, with the
/// overflow bit on `c_out`.
pub struct Add16Gate {
    adders: Vec<FullAdderGate>,
}

impl Add16Gate {
    /// Wire the carry chain from `c_in` through 16 full adders to `c_out`.
    #[must_use]
    pub fn new(a: &Bus16, b: &Bus16, c_in: &Signal, sum: &Bus16, c_out: &Signal) -> Self {
        let mut adders = Vec::with_capacity(16);
        let mut carry = c_in.clone();

        for i in 0..16 {
            let carry_out = if i == 15 { c_out.clone() } else { Signal::new() };
            adders.push(FullAdderGate::new(
                &a.line(i),
                &b.line(i),
                &carry,
                &carry_out,
                &sum.line(i),
            ));
            carry = carry_out;
        }

        Self { adders }
    }
}

impl Gate for Add16Gate {
    fn update(&mut self) {
        for adder in &mut self.adders {
            adder.update();
        }
    }
}

/// 16-bit subtractor: `a + !b + 1`, two's complement, carry discarded.
pub struct Sub16Gate {
    invert: NotNGate<16>,
    one: TieHighGate,
    add: Add16Gate,
}

impl Sub16Gate {
    /// Wire a subtractor between two operand buses and an output bus.
    #[must_use]
    pub fn new(a: &Bus16, b: &Bus16, out: &Bus16) -> Self {
        let b_inverted = Bus16::new();
        let one = Signal::new();
        let spill = Signal::new();

        Self {
            invert: NotNGate::new(b, &b_inverted),
            one: TieHighGate::new(&one),
            add: Add16Gate::new(a, &b_inverted, &one, out, &spill),
        }
    }
}

impl Gate for Sub16Gate {
    fn update(&mut self) {
        self.invert.update();
        self.one.update();
        self.add.update();
    }
}

/// 16-bit incrementer: `in + 1`, wrapping at 2^16.
pub struct Inc16Gate {
    one: TieHighGate,
    add: Add16Gate,
}

impl Inc16Gate {
    /// Wire an incrementer between an input bus and an output bus.
    ///
    /// Adds an undriven all-zero bus to the input with the carry-in tied
    /// high.
    #[must_use]
    pub fn new(input: &Bus16, out: &Bus16) -> Self {
        let zeros = Bus16::new();
        let one = Signal::new();
        let spill = Signal::new();

        Self {
            one: TieHighGate::new(&one),
            add: Add16Gate::new(&zeros, input, &one, out, &spill),
        }
    }
}

impl Gate for Inc16Gate {
    fn update(&mut self) {
        self.one.update();
        self.add.update();
    }
}

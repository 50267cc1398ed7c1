//! The combinational gate library derived from NAND.
//!
//! Single-bit gates first, then their bit-parallel bus extensions, then
//! the wide reduction and routing gates (mask, AND/OR reductions, one-hot
//! decoder, word multiplexer). Each gate's output law is realized purely
//! by NAND composition; `update` orders are fixed so that every internal
//! consumer reads freshly computed levels.

use crate::gate::{Gate, NandGate};
use crate::signal::{Bus, Signal};

/// NOT: a NAND with its inputs joined.
pub struct NotGate {
    nand: NandGate,
}

impl NotGate {
    /// Wire an inverter between the input and output lines.
    #[must_use]
    pub fn new(input: &Signal, out: &Signal) -> Self {
        Self {
            nand: NandGate::new(input, input, out),
        }
    }
}

impl Gate for NotGate {
    fn update(&mut self) {
        self.nand.update();
    }
}

/// AND: NAND followed by NOT.
pub struct AndGate {
    nand: NandGate,
    invert: NotGate,
}

impl AndGate {
    /// Wire an AND between two input lines and an output line.
    #[must_use]
    pub fn new(a: &Signal, b: &Signal, out: &Signal) -> Self {
        let nand_out = Signal::new();

        Self {
            nand: NandGate::new(a, b, &nand_out),
            invert: NotGate::new(&nand_out, out),
        }
    }
}

impl Gate for AndGate {
    fn update(&mut self) {
        self.nand.update();
        self.invert.update();
    }
}

/// OR: De Morgan, `NAND(!a, !b)`.
pub struct OrGate {
    invert_a: NotGate,
    invert_b: NotGate,
    nand: NandGate,
}

impl OrGate {
    /// Wire an OR between two input lines and an output line.
    #[must_use]
    pub fn new(a: &Signal, b: &Signal, out: &Signal) -> Self {
        let a_n = Signal::new();
        let b_n = Signal::new();

        Self {
            invert_a: NotGate::new(a, &a_n),
            invert_b: NotGate::new(b, &b_n),
            nand: NandGate::new(&a_n, &b_n, out),
        }
    }
}

impl Gate for OrGate {
    fn update(&mut self) {
        self.invert_a.update();
        self.invert_b.update();
        self.nand.update();
    }
}

/// XOR: `(a | b) & !(a & b)`.
pub struct XorGate {
    either: OrGate,
    not_both: NandGate,
    and: AndGate,
}

impl XorGate {
    /// Wire a XOR between two input lines and an output line.
    #[must_use]
    pub fn new(a: &Signal, b: &Signal, out: &Signal) -> Self {
        let either = Signal::new();
        let not_both = Signal::new();

        Self {
            either: OrGate::new(a, b, &either),
            not_both: NandGate::new(a, b, &not_both),
            and: AndGate::new(&either, &not_both, out),
        }
    }
}

impl Gate for XorGate {
    fn update(&mut self) {
        self.either.update();
        self.not_both.update();
        self.and.update();
    }
}

/// 2-to-1 select: `out = sel ? a : b`.
pub struct SelectGate {
    invert: NotGate,
    pick_a: AndGate,
    pick_b: AndGate,
    merge: OrGate,
}

impl SelectGate {
    /// Wire a select between the two candidate lines and an output line.
    #[must_use]
    pub fn new(sel: &Signal, a: &Signal, b: &Signal, out: &Signal) -> Self {
        let sel_n = Signal::new();
        let a_hit = Signal::new();
        let b_hit = Signal::new();

        Self {
            invert: NotGate::new(sel, &sel_n),
            pick_a: AndGate::new(sel, a, &a_hit),
            pick_b: AndGate::new(&sel_n, b, &b_hit),
            merge: OrGate::new(&a_hit, &b_hit, out),
        }
    }
}

impl Gate for SelectGate {
    fn update(&mut self) {
        self.invert.update();
        self.pick_a.update();
        self.pick_b.update();
        self.merge.update();
    }
}

/// Bitwise NOT over `N` lines.
pub struct NotNGate<const N: usize> {
    gates: Vec<NotGate>,
}

impl<const N: usize> NotNGate<N> {
    /// Wire one inverter per bus position.
    #[must_use]
    pub fn new(input: &Bus<N>, out: &Bus<N>) -> Self {
        Self {
            gates: (0..N)
                .map(|i| NotGate::new(&input.line(i), &out.line(i)))
                .collect(),
        }
    }
}

impl<const N: usize> Gate for NotNGate<N> {
    fn update(&mut self) {
        for gate in &mut self.gates {
            gate.update();
        }
    }
}

/// Bitwise AND over `N` lines.
pub struct AndNGate<const N: usize> {
    gates: Vec<AndGate>,
}

impl<const N: usize> AndNGate<N> {
    /// Wire one AND per bus position.
    #[must_use]
    pub fn new(a: &Bus<N>, b: &Bus<N>, out: &Bus<N>) -> Self {
        Self {
            gates: (0..N)
                .map(|i| AndGate::new(&a.line(i), &b.line(i), &out.line(i)))
                .collect(),
        }
    }
}

impl<const N: usize> Gate for AndNGate<N> {
    fn update(&mut self) {
        for gate in &mut self.gates {
            gate.update();
        }
    }
}

/// Bitwise OR over `N` lines.
pub struct OrNGate<const N: usize> {
    gates: Vec<OrGate>,
}

impl<const N: usize> OrNGate<N> {
    /// Wire one OR per bus position.
    #[must_use]
    pub fn new(a: &Bus<N>, b: &Bus<N>, out: &Bus<N>) -> Self {
        Self {
            gates: (0..N)
                .map(|i| OrGate::new(&a.line(i), &b.line(i), &out.line(i)))
                .collect(),
        }
    }
}

impl<const N: usize> Gate for OrNGate<N> {
    fn update(&mut self) {
        for gate in &mut self.gates {
            gate.update();
        }
    }
}

/// Bitwise XOR over `N` lines.
pub struct XorNGate<const N: usize> {
    gates: Vec<XorGate>,
}

impl<const N: usize> XorNGate<N> {
    /// Wire one XOR per bus position.
    #[must_use]
    pub fn new(a: &Bus<N>, b: &Bus<N>, out: &Bus<N>) -> Self {
        Self {
            gates: (0..N)
                .map(|i| XorGate::new(&a.line(i), &b.line(i), &out.line(i)))
                .collect(),
        }
    }
}

impl<const N: usize> Gate for XorNGate<N> {
    fn update(&mut self) {
        for gate in &mut self.gates {
            gate.update();
        }
    }
}

/// Bitwise 2-to-1 select over `N` lines with a shared select line.
pub struct SelectNGate<const N: usize> {
    gates: Vec<SelectGate>,
}

impl<const N: usize> SelectNGate<N> {
    /// Wire one select per bus position, all steered by `sel`.
    #[must_use]
    pub fn new(sel: &Signal, a: &Bus<N>, b: &Bus<N>, out: &Bus<N>) -> Self {
        Self {
            gates: (0..N)
                .map(|i| SelectGate::new(sel, &a.line(i), &b.line(i), &out.line(i)))
                .collect(),
        }
    }
}

impl<const N: usize> Gate for SelectNGate<N> {
    fn update(&mut self) {
        for gate in &mut self.gates {
            gate.update();
        }
    }
}

/// Mask `N` lines with a single line: `out[i] = a && b[i]`.
pub struct Mask1xNGate<const N: usize> {
    gates: Vec<AndGate>,
}

impl<const N: usize> Mask1xNGate<N> {
    /// Wire one AND per bus position, all sharing the mask line `a`.
    #[must_use]
    pub fn new(a: &Signal, b: &Bus<N>, out: &Bus<N>) -> Self {
        Self {
            gates: (0..N)
                .map(|i| AndGate::new(a, &b.line(i), &out.line(i)))
                .collect(),
        }
    }
}

impl<const N: usize> Gate for Mask1xNGate<N> {
    fn update(&mut self) {
        for gate in &mut self.gates {
            gate.update();
        }
    }
}

/// 4-input AND reduction: `out = a && b && c && d`.
pub struct Reduce4Gate {
    and_ab: AndGate,
    and_cd: AndGate,
    merge: AndGate,
}

impl Reduce4Gate {
    /// Wire the reduction between four input lines and an output line.
    #[must_use]
    pub fn new(a: &Signal, b: &Signal, c: &Signal, d: &Signal, out: &Signal) -> Self {
        let ab = Signal::new();
        let cd = Signal::new();

        Self {
            and_ab: AndGate::new(a, b, &ab),
            and_cd: AndGate::new(c, d, &cd),
            merge: AndGate::new(&ab, &cd, out),
        }
    }
}

impl Gate for Reduce4Gate {
    fn update(&mut self) {
        self.and_ab.update();
        self.and_cd.update();
        self.merge.update();
    }
}

/// 16-input OR reduction: high iff any input line is high.
///
/// Built as a binary tree of ORs, four levels deep. The constructor pushes
/// the tree level by level, so iterating the gates in push order is the
/// levelized update order.
pub struct Combine16Gate {
    ors: Vec<OrGate>,
}

impl Combine16Gate {
    /// Wire the reduction between a 16-line bus and an output line.
    #[must_use]
    pub fn new(input: &Bus<16>, out: &Signal) -> Self {
        let mut ors = Vec::with_capacity(15);
        let mut layer: Vec<Signal> = (0..16).map(|i| input.line(i)).collect();

        while layer.len() > 2 {
            let mut next = Vec::with_capacity(layer.len() / 2);
            for pair in layer.chunks_exact(2) {
                let merged = Signal::new();
                ors.push(OrGate::new(&pair[0], &pair[1], &merged));
                next.push(merged);
            }
            layer = next;
        }
        ors.push(OrGate::new(&layer[0], &layer[1], out));

        Self { ors }
    }
}

impl Gate for Combine16Gate {
    fn update(&mut self) {
        for or in &mut self.ors {
            or.update();
        }
    }
}

/// 4-to-16 one-hot decoder: output line `k` is high iff the address
/// reads `k`.
pub struct Decoder4to16Gate {
    inverters: Vec<NotGate>,
    terms: Vec<Reduce4Gate>,
}

impl Decoder4to16Gate {
    /// Wire the decoder between a 4-line address bus and a 16-line bus.
    ///
    /// Each output is a 4-way AND over the address lines, taking the
    /// inverted line wherever the output index has a zero bit.
    #[must_use]
    pub fn new(addr: &Bus<4>, out: &Bus<16>) -> Self {
        let low: [Signal; 4] = std::array::from_fn(|_| Signal::new());
        let inverters = (0..4)
            .map(|i| NotGate::new(&addr.line(i), &low[i]))
            .collect();

        let terms = (0..16)
            .map(|k| {
                let pick = |bit: usize| {
                    if k >> bit & 1 == 0 {
                        low[bit].clone()
                    } else {
                        addr.line(bit)
                    }
                };
                Reduce4Gate::new(&pick(3), &pick(2), &pick(1), &pick(0), &out.line(k))
            })
            .collect();

        Self { inverters, terms }
    }
}

impl Gate for Decoder4to16Gate {
    fn update(&mut self) {
        for inverter in &mut self.inverters {
            inverter.update();
        }
        for term in &mut self.terms {
            term.update();
        }
    }
}

/// 16-to-1 multiplexer: `out = input[addr]`.
///
/// The address decodes to a one-hot mask, the mask picks one input line,
/// and an OR reduction folds the masked bus down to the output.
pub struct Mux16to1Gate {
    decoder: Decoder4to16Gate,
    mask: AndNGate<16>,
    combine: Combine16Gate,
}

impl Mux16to1Gate {
    /// Wire the multiplexer between a 16-line bus, a 4-line address bus
    /// and an output line.
    #[must_use]
    pub fn new(input: &Bus<16>, addr: &Bus<4>, out: &Signal) -> Self {
        let hot = Bus::<16>::new();
        let masked = Bus::<16>::new();

        Self {
            decoder: Decoder4to16Gate::new(addr, &hot),
            mask: AndNGate::new(input, &hot, &masked),
            combine: Combine16Gate::new(&masked, out),
        }
    }
}

impl Gate for Mux16to1Gate {
    fn update(&mut self) {
        self.decoder.update();
        self.mask.update();
        self.combine.update();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::Bus16;

    /// Define a truth-table test for a two-input gate.
    macro_rules! table2 {
        ($name:ident, $gate:ty, $(($a:literal, $b:literal) => $out:literal),+ $(,)?) => {
            #[test]
            fn $name() {
                let a = Signal::new();
                let b = Signal::new();
                let out = Signal::new();
                let mut gate = <$gate>::new(&a, &b, &out);

                $(
                    a.set($a);
                    b.set($b);
                    gate.update();
                    assert_eq!(out.get(), $out);
                )+
            }
        };
    }

    table2!(and_table, AndGate,
        (false, false) => false,
        (false, true) => false,
        (true, false) => false,
        (true, true) => true,
    );

    table2!(or_table, OrGate,
        (false, false) => false,
        (false, true) => true,
        (true, false) => true,
        (true, true) => true,
    );

    table2!(xor_table, XorGate,
        (false, false) => false,
        (false, true) => true,
        (true, false) => true,
        (true, true) => false,
    );

    #[test]
    fn not_table() {
        let input = Signal::new();
        let out = Signal::new();
        let mut gate = NotGate::new(&input, &out);

        gate.update();
        assert!(out.get());

        input.set(true);
        gate.update();
        assert!(!out.get());
    }

    #[test]
    fn select_picks_by_sel() {
        let sel = Signal::new();
        let a = Signal::new();
        let b = Signal::new();
        let out = Signal::new();
        let mut gate = SelectGate::new(&sel, &a, &b, &out);

        let mut check = |sel_level, a_level, b_level, expect| {
            sel.set(sel_level);
            a.set(a_level);
            b.set(b_level);
            gate.update();
            assert_eq!(out.get(), expect);
        };

        check(true, true, false, true);
        check(false, true, false, false);
        check(true, false, true, false);
        check(false, false, true, true);
    }

    #[test]
    fn combinational_update_is_idempotent() {
        let a = Signal::new();
        let b = Signal::new();
        let out = Signal::new();
        let mut gate = XorGate::new(&a, &b, &out);

        a.set(true);
        gate.update();
        let first = out.get();
        gate.update();
        assert_eq!(out.get(), first);
    }

    #[test]
    fn bitwise_not() {
        let input = Bus16::new();
        let out = Bus16::new();
        let mut gate = NotNGate::new(&input, &out);

        input.set_value(0xaaaa);
        gate.update();
        assert_eq!(out.value(), 0x5555);
    }

    #[test]
    fn bitwise_and() {
        let a = Bus16::new();
        let b = Bus16::new();
        let out = Bus16::new();
        let mut gate = AndNGate::new(&a, &b, &out);

        a.set_value(0xaaaa);
        b.set_value(0x05af);
        gate.update();
        assert_eq!(out.value(), 0x00aa);
    }

    #[test]
    fn bitwise_or() {
        let a = Bus16::new();
        let b = Bus16::new();
        let out = Bus16::new();
        let mut gate = OrNGate::new(&a, &b, &out);

        a.set_value(0xaa00);
        b.set_value(0x0180);
        gate.update();
        assert_eq!(out.value(), 0xab80);
    }

    #[test]
    fn bitwise_xor() {
        let a = Bus16::new();
        let b = Bus16::new();
        let out = Bus16::new();
        let mut gate = XorNGate::new(&a, &b, &out);

        a.set_value(0xaaaa);
        b.set_value(0x05ab);
        gate.update();
        assert_eq!(out.value(), 0xaf01);
    }

    #[test]
    fn bitwise_select() {
        let sel = Signal::new();
        let a = Bus16::new();
        let b = Bus16::new();
        let out = Bus16::new();
        let mut gate = SelectNGate::new(&sel, &a, &b, &out);

        a.set_value(0x1234);
        b.set_value(0x5678);

        sel.set(true);
        gate.update();
        assert_eq!(out.value(), 0x1234);

        sel.set(false);
        gate.update();
        assert_eq!(out.value(), 0x5678);
    }

    #[test]
    fn mask_gates_the_whole_bus() {
        let a = Signal::new();
        let b = Bus::<4>::new();
        let out = Bus::<4>::new();
        let mut gate = Mask1xNGate::new(&a, &b, &out);

        b.set_value(5);
        gate.update();
        assert_eq!(out.value(), 0);

        a.set(true);
        gate.update();
        assert_eq!(out.value(), 5);
    }

    #[test]
    fn reduce4_is_high_only_when_all_are() {
        let inputs: [Signal; 4] = std::array::from_fn(|_| Signal::new());
        let out = Signal::new();
        let mut gate = Reduce4Gate::new(&inputs[0], &inputs[1], &inputs[2], &inputs[3], &out);

        for word in 0..16u32 {
            for (i, input) in inputs.iter().enumerate() {
                input.set(word >> i & 1 != 0);
            }
            gate.update();
            assert_eq!(out.get(), word == 0xf);
        }
    }

    #[test]
    fn combine16_spots_any_high_line() {
        let input = Bus16::new();
        let out = Signal::new();
        let mut gate = Combine16Gate::new(&input, &out);

        gate.update();
        assert!(!out.get());

        for i in 0..16 {
            input.set_value(1 << i);
            gate.update();
            assert!(out.get());
        }
    }

    #[test]
    fn decoder_output_is_one_hot() {
        let addr = Bus::<4>::new();
        let out = Bus16::new();
        let mut gate = Decoder4to16Gate::new(&addr, &out);

        for k in 0..16 {
            addr.set_value(k);
            gate.update();
            assert_eq!(out.value(), 1 << k);
        }
    }

    #[test]
    fn mux_selects_the_addressed_line() {
        let input = Bus16::new();
        let addr = Bus::<4>::new();
        let out = Signal::new();
        let mut gate = Mux16to1Gate::new(&input, &addr, &out);

        input.set_value(0xa5c3);
        for k in 0..16 {
            addr.set_value(k);
            gate.update();
            assert_eq!(out.get(), 0xa5c3 >> k & 1 != 0);
        }
    }
}

//! Minimal AArch64 decoding for the volume clamp search
//!
//! Only the handful of encodings the search looks at are decoded; every
//! other word is [`Instruction::Other`].

/// Width of a scalar floating-point register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FpWidth {
    Half,
    Single,
    Double,
}

/// A scalar floating-point register (`h0`, `s1`, `d2`, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FpReg {
    pub width: FpWidth,
    pub index: u8,
}

impl FpReg {
    pub const S0: FpReg = FpReg::single(0);

    pub const fn single(index: u8) -> Self {
        Self {
            width: FpWidth::Single,
            index,
        }
    }
}

/// Condition code `gt`
pub const COND_GT: u8 = 0b1100;

/// Register number that means `sp` in 64-bit `add` (immediate)
pub const REG_SP: u8 = 31;

/// Decoded instruction
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Instruction {
    /// `add <rd>, <rn>, #imm`
    AddImm { rd: u8, rn: u8, imm: u32 },
    /// `fmov <rd>, #imm`
    FmovImm { rd: FpReg, value: f64 },
    /// `fmov` between registers
    FmovReg,
    /// `fcmp <rn>, <rm>`, or `fcmp <rn>, #0.0` when `rm` is `None`
    Fcmp { rn: FpReg, rm: Option<FpReg> },
    /// `fcsel <rd>, <rn>, <rm>, <cond>`
    Fcsel { rd: FpReg, rn: FpReg, rm: FpReg, cond: u8 },
    /// Branches, calls and returns
    Branch,
    Other,
}

fn bits(word: u32, shift: u32, width: u32) -> u32 {
    (word >> shift) & ((1 << width) - 1)
}

fn fp_reg(ftype: u32, index: u32) -> Option<FpReg> {
    let width = match ftype {
        0b00 => FpWidth::Single,
        0b01 => FpWidth::Double,
        0b11 => FpWidth::Half,
        _ => return None,
    };
    Some(FpReg {
        width,
        index: index as u8,
    })
}

/// Expand the 8-bit `fmov` immediate
fn expand_fp_imm(imm8: u32) -> f64 {
    let sign = if imm8 & 0x80 != 0 { -1.0 } else { 1.0 };
    let exponent = (bits(imm8, 4, 3) as i32 ^ 0b100) - 3;
    let mantissa = 1.0 + bits(imm8, 0, 4) as f64 / 16.0;
    sign * mantissa * 2f64.powi(exponent)
}

fn is_branch(word: u32) -> bool {
    // b, bl
    word & 0x7C00_0000 == 0x1400_0000
        // b.cond
        || word & 0xFF00_0010 == 0x5400_0000
        // cbz, cbnz, tbz, tbnz
        || word & 0x7E00_0000 == 0x3400_0000
        || word & 0x7E00_0000 == 0x3600_0000
        // br, blr, ret and their authenticated forms
        || word & 0xFE1F_0000 == 0xD61F_0000
}

/// Decode one instruction word
pub fn decode(word: u32) -> Instruction {
    // 64-bit form only; the 32-bit one addresses wsp
    if word & 0xFF80_0000 == 0x9100_0000 {
        let shift = bits(word, 22, 1) * 12;
        return Instruction::AddImm {
            rd: bits(word, 0, 5) as u8,
            rn: bits(word, 5, 5) as u8,
            imm: bits(word, 10, 12) << shift,
        };
    }

    if is_branch(word) {
        return Instruction::Branch;
    }

    // Scalar floating-point data processing: 0 0 0 11110 ftype 1 ...
    if word & 0xFF20_0000 != 0x1E20_0000 {
        return Instruction::Other;
    }
    let ftype = bits(word, 22, 2);
    let rd = bits(word, 0, 5);
    let rn = bits(word, 5, 5);
    let rm = bits(word, 16, 5);

    if word & 0xFF20_1FE0 == 0x1E20_1000 {
        return match fp_reg(ftype, rd) {
            Some(rd) => Instruction::FmovImm {
                rd,
                value: expand_fp_imm(bits(word, 13, 8)),
            },
            None => Instruction::Other,
        };
    }

    if word & 0xFF3F_FC00 == 0x1E20_4000 {
        return Instruction::FmovReg;
    }

    if word & 0xFF20_FC07 == 0x1E20_2000 {
        let Some(rn) = fp_reg(ftype, rn) else {
            return Instruction::Other;
        };
        return match bits(word, 3, 2) {
            0b00 => Instruction::Fcmp { rn, rm: fp_reg(ftype, rm) },
            0b01 => Instruction::Fcmp { rn, rm: None },
            // fcmpe
            _ => Instruction::Other,
        };
    }

    if word & 0xFF20_0C00 == 0x1E20_0C00 {
        return match (fp_reg(ftype, rd), fp_reg(ftype, rn), fp_reg(ftype, rm)) {
            (Some(rd), Some(rn), Some(rm)) => Instruction::Fcsel {
                rd,
                rn,
                rm,
                cond: bits(word, 12, 4) as u8,
            },
            _ => Instruction::Other,
        };
    }

    Instruction::Other
}

/// `fmov` between general-purpose and floating-point registers
fn is_fmov_general(word: u32) -> bool {
    word & 0x7F36_FC00 == 0x1E26_0000
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Search {
    Idle,
    StackAddr,
    One(FpReg),
    Compared(FpReg),
}

/// Find the byte offset of the `fcsel` that clamps the master volume
///
/// The sequence looked for is
///
/// ```text
/// add   x?, sp, #8
/// fmov  s1, #1.0
/// fcmp  s0, s1
/// fcsel s1, s1, s0, gt
/// ```
///
/// with unrelated instructions allowed in between and branches ending the
/// match. Returns `None` unless exactly one match exists.
pub fn find_clamp(text: &[u8]) -> Option<usize> {
    let mut matches = Vec::new();
    let mut state = Search::Idle;

    for (index, chunk) in text.chunks_exact(4).enumerate() {
        let word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        let inst = decode(word);

        if inst == Instruction::Branch {
            state = Search::Idle;
            continue;
        }

        state = match (state, inst) {
            (Search::Idle, Instruction::AddImm { rn: REG_SP, imm: 8, .. }) => Search::StackAddr,
            (Search::Idle, _) => Search::Idle,

            (Search::StackAddr, Instruction::FmovImm { rd, value }) if value == 1.0 => Search::One(rd),
            (Search::StackAddr, Instruction::FmovImm { .. } | Instruction::FmovReg) => Search::Idle,
            (Search::StackAddr, _) if is_fmov_general(word) => Search::Idle,
            (Search::StackAddr, _) => Search::StackAddr,

            (Search::One(one), Instruction::Fcmp { rn, rm }) => {
                let operand = |reg: FpReg| reg == FpReg::S0 || reg == one;
                match rm {
                    Some(rm) if operand(rn) && operand(rm) => Search::Compared(one),
                    _ => Search::Idle,
                }
            }
            (Search::One(one), _) => Search::One(one),

            (Search::Compared(one), Instruction::Fcsel { rn, rm, cond, .. })
                if rn == one && rm == FpReg::S0 && cond == COND_GT =>
            {
                matches.push(index * 4);
                Search::Idle
            }
            (Search::Compared(one), _) => Search::Compared(one),
        };
    }

    match matches.as_slice() {
        [offset] => Some(*offset),
        _ => None,
    }
}

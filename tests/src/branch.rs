use crate::helpers::*;
use common::constants::PC_START;
use emu_lib::Cond;

// br with the given n, z, p mask and an offset of 4
fn br(mask: u16) -> u16 {
    (mask << 9) | 4
}

fn step_branch(mask: u16, cond: Cond) -> u16 {
    let (mut emu, _) = emulator(&[br(mask)]);
    emu.get_state_mut().set_cond(cond);
    emu.run_ins().unwrap();
    emu.pc()
}

#[test]
fn every_mask_and_condition() {
    let taken = PC_START + 1 + 4;
    let not_taken = PC_START + 1;
    for mask in 0..8u16 {
        for cond in [Cond::Neg, Cond::Zero, Cond::Pos] {
            let exp = if mask & cond.bits() != 0 { taken } else { not_taken };
            assert_eq!(step_branch(mask, cond), exp, "mask {mask:03b}, {cond:?}");
        }
    }
}

#[test]
fn brz_after_zero_result() {
    let (mut emu, _) = emulator(&[
        0x1021, // add r0, r0, #1
        0x103f, // add r0, r0, #-1
        0x0404, // brz #4
    ]);
    emu.run_ins().unwrap();
    emu.run_ins().unwrap();
    assert_eq!(emu.cond(), Cond::Zero);
    emu.run_ins().unwrap();
    assert_eq!(emu.pc(), PC_START + 3 + 4);
}

#[test]
fn brz_after_positive_result() {
    let (mut emu, _) = emulator(&[
        0x1021, // add r0, r0, #1
        0x0404, // brz #4
    ]);
    emu.run_ins().unwrap();
    emu.run_ins().unwrap();
    assert_eq!(emu.pc(), PC_START + 2);
}

#[test]
fn initial_condition_is_zero() {
    let (mut emu, _) = emulator(&[
        0x0404, // brz #4
    ]);
    emu.run_ins().unwrap();
    assert_eq!(emu.pc(), PC_START + 5);
}

#[test]
fn backwards() {
    let (mut emu, _) = emulator(&[
        0x1021, // add r0, r0, #1
        0x0ffe, // brnzp #-2
    ]);
    for _ in 0..5 {
        emu.run_ins().unwrap();
        emu.run_ins().unwrap();
        assert_eq!(emu.pc(), PC_START);
    }
    assert_eq!(emu.reg_read_word(common::asm::Reg::R0), 5);
}

#[test]
fn offset_wraps() {
    let (mut emu, _) = emulator(&[]);
    emu.load_words(0xfffe, &[
        0x0e04, // brnzp #4
    ]);
    emu.get_state_mut().set_pc(0xfffe);
    emu.run_ins().unwrap();
    assert_eq!(emu.pc(), 0x0003);
}

#[test]
fn branch_leaves_condition() {
    let (mut emu, _) = emulator(&[
        0x0e01, // brnzp #1
        HALT,
        HALT,
    ]);
    emu.get_state_mut().set_cond(Cond::Neg);
    emu.run().unwrap();
    assert_eq!(emu.cond(), Cond::Neg);
    assert_eq!(emu.pc(), PC_START + 3);
}

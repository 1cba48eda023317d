use crate::helpers::*;
use common::asm::Reg;
use emu_lib::Cond;

fn run_alu(ins: u16, regs: &[(Reg, u16)]) -> emu_lib::Emulator {
    let (mut emu, _) = emulator(&[ins, HALT]);
    for (reg, val) in regs {
        emu.reg_write_word(*reg, *val);
    }
    emu.run().unwrap();
    emu
}

#[test]
fn add_imm() {
    // add r0, r1, #5
    let emu = run_alu(0b0001_000_001_1_00101, &[(Reg::R1, 10)]);
    assert_eq!(emu.reg_read_word(Reg::R0), 15);
    assert_eq!(emu.cond(), Cond::Pos);
}

#[test]
fn add_negative_imm() {
    // add r0, r0, #-1
    let emu = run_alu(0x103f, &[(Reg::R0, 1)]);
    assert_eq!(emu.reg_read_word(Reg::R0), 0);
    assert_eq!(emu.cond(), Cond::Zero);

    let emu = run_alu(0x103f, &[(Reg::R0, 0)]);
    assert_eq!(emu.reg_read_word(Reg::R0), 0xffff);
    assert_eq!(emu.cond(), Cond::Neg);
}

#[test]
fn add_reg() {
    // add r2, r0, r1
    let emu = run_alu(0x1401, &[(Reg::R0, 0x1234), (Reg::R1, 0x1111)]);
    assert_eq!(emu.reg_read_word(Reg::R2), 0x2345);
    assert_eq!(emu.cond(), Cond::Pos);
}

#[test]
fn add_reg_ignores_unused_bits() {
    // add r0, r1, r2 with bits 4:3 set; bit 5 clear selects the register
    let emu = run_alu(0b0001_000_001_0_11_010, &[(Reg::R1, 3), (Reg::R2, 4)]);
    assert_eq!(emu.reg_read_word(Reg::R0), 7);
}

#[test]
fn add_wraps() {
    // add r2, r0, r1
    let emu = run_alu(0x1401, &[(Reg::R0, 0xffff), (Reg::R1, 2)]);
    assert_eq!(emu.reg_read_word(Reg::R2), 1);
    assert_eq!(emu.cond(), Cond::Pos);

    let emu = run_alu(0x1401, &[(Reg::R0, 0x7fff), (Reg::R1, 1)]);
    assert_eq!(emu.reg_read_word(Reg::R2), 0x8000);
    assert_eq!(emu.cond(), Cond::Neg);
}

#[test]
fn and_imm() {
    // and r0, r0, #0
    let emu = run_alu(0x5020, &[(Reg::R0, 0xbeef)]);
    assert_eq!(emu.reg_read_word(Reg::R0), 0);
    assert_eq!(emu.cond(), Cond::Zero);

    // and r0, r1, #15
    let emu = run_alu(0x506f, &[(Reg::R1, 0xabcd)]);
    assert_eq!(emu.reg_read_word(Reg::R0), 0xd);

    // and r0, r1, #-16
    let emu = run_alu(0x5070, &[(Reg::R1, 0xabcd)]);
    assert_eq!(emu.reg_read_word(Reg::R0), 0xabc0);
    assert_eq!(emu.cond(), Cond::Neg);
}

#[test]
fn and_reg() {
    // and r2, r0, r1
    let emu = run_alu(0x5401, &[(Reg::R0, 0xff0f), (Reg::R1, 0x0ff0)]);
    assert_eq!(emu.reg_read_word(Reg::R2), 0x0f00);
    assert_eq!(emu.cond(), Cond::Pos);
}

#[test]
fn not() {
    // not r1, r0
    let emu = run_alu(0x923f, &[(Reg::R0, 0x00ff)]);
    assert_eq!(emu.reg_read_word(Reg::R1), 0xff00);
    assert_eq!(emu.cond(), Cond::Neg);

    let emu = run_alu(0x923f, &[(Reg::R0, 0xffff)]);
    assert_eq!(emu.reg_read_word(Reg::R1), 0);
    assert_eq!(emu.cond(), Cond::Zero);
}

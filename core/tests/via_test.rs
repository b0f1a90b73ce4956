use std::rc::Rc;

use vectron_core::core::bus::MemoryBusDevice;
use vectron_core::core::engine::{AudioContext, Input, RenderContext};
use vectron_core::core::error::{ErrorHandler, ErrorPolicy};
use vectron_core::via::Via;

fn make_via() -> (Via, Rc<ErrorHandler>) {
    let handler = Rc::new(ErrorHandler::new());
    (Via::new(Rc::clone(&handler)), handler)
}

fn update(via: &mut Via, cycles: u64, input: &Input, render: &mut RenderContext) {
    let mut audio = AudioContext;
    via.update(cycles, input, render, &mut audio);
}

#[test]
fn test_store_registers_read_back() {
    let (mut via, _) = make_via();

    via.write(0x2, 0x5A).unwrap(); // DDRB
    assert_eq!(via.read(0x2).unwrap(), 0x5A);

    via.write(0x3, 0xFF).unwrap(); // DDRA
    assert_eq!(via.read(0x3).unwrap(), 0xFF);

    via.write(0xC, 0xEE).unwrap(); // PeriphCntl, CA2=CB2=111
    assert_eq!(via.read(0xC).unwrap(), 0xEE);

    via.write(0xE, 0xC0).unwrap(); // InterruptEnable
    assert_eq!(via.read(0xE).unwrap(), 0xC0);
}

#[test]
fn test_port_a_read_back_respects_output_mode() {
    let (mut via, _) = make_via();
    via.write(0x3, 0xFF).unwrap(); // DDRA all outputs
    via.write(0x1, 0x77).unwrap();
    assert_eq!(via.read(0x1).unwrap(), 0x77);
}

#[test]
fn test_register_mirroring_every_16_bytes() {
    let (mut via, _) = make_via();
    via.write(0x2, 0x12).unwrap();
    assert_eq!(via.read(0x2 + 0x10).unwrap(), 0x12);
    assert_eq!(via.read(0x2 + 0xF0).unwrap(), 0x12);
}

#[test]
fn test_timer1_one_shot_interrupt_timing() {
    let (mut via, _) = make_via();
    let input = Input::new();
    let mut render = RenderContext::default();

    via.write(0x4, 0x10).unwrap(); // T1 counter low -> latch
    via.write(0x5, 0x00).unwrap(); // T1 counter high: arm with 0x0010
    assert_eq!(via.read(0xD).unwrap() & 0x40, 0); // IF clear

    update(&mut via, 0x10, &input, &mut render);
    assert_eq!(via.read(0xD).unwrap() & 0x40, 0); // not yet

    update(&mut via, 1, &input, &mut render);
    assert_eq!(via.read(0xD).unwrap() & 0x40, 0x40); // fires at HL+1
}

#[test]
fn test_timer1_interrupt_gated_by_enable() {
    let (mut via, _) = make_via();
    let input = Input::new();
    let mut render = RenderContext::default();

    via.write(0x4, 0x02).unwrap();
    via.write(0x5, 0x00).unwrap();
    update(&mut via, 3, &input, &mut render);

    assert!(!via.irq_enabled()); // enable bit not set
    via.write(0xE, 0x40).unwrap();
    assert!(via.irq_enabled());

    via.write(0xD, 0x40).unwrap(); // clear T1 IF
    assert!(!via.irq_enabled());
    assert_eq!(via.read(0xD).unwrap() & 0x40, 0);
}

#[test]
fn test_timer1_rearm_clears_interrupt_flag() {
    let (mut via, _) = make_via();
    let input = Input::new();
    let mut render = RenderContext::default();

    via.write(0x4, 0x01).unwrap();
    via.write(0x5, 0x00).unwrap();
    update(&mut via, 2, &input, &mut render);
    assert_eq!(via.read(0xD).unwrap() & 0x40, 0x40);

    via.write(0x5, 0x00).unwrap(); // re-arm
    assert_eq!(via.read(0xD).unwrap() & 0x40, 0);
}

#[test]
fn test_timer2_same_register_pattern() {
    let (mut via, _) = make_via();
    let input = Input::new();
    let mut render = RenderContext::default();

    via.write(0x8, 0x03).unwrap();
    via.write(0x9, 0x00).unwrap();
    update(&mut via, 4, &input, &mut render);
    assert_eq!(via.read(0xD).unwrap() & 0x20, 0x20);
}

#[test]
fn test_firq_never_asserted() {
    let (mut via, _) = make_via();
    assert!(!via.firq_enabled());
}

#[test]
fn test_ddra_must_be_all_input_or_all_output() {
    let (mut via, handler) = make_via();

    handler.set_policy(ErrorPolicy::Ignore);
    assert!(via.write(0x3, 0x0F).is_ok());

    handler.set_policy(ErrorPolicy::Fail);
    assert!(via.write(0x3, 0x0F).is_err());
    assert!(via.write(0x3, 0xFF).is_ok());
    assert!(via.write(0x3, 0x00).is_ok());
}

#[test]
fn test_periph_cntl_rejects_odd_control_fields() {
    let (mut via, handler) = make_via();
    handler.set_policy(ErrorPolicy::Fail);

    assert!(via.write(0xC, 0x00).is_err()); // CA2/CB2 = 000
    assert!(via.write(0xC, 0xCC).is_ok()); // CA2=110, CB2=110
    assert!(via.write(0xC, 0xEE).is_ok()); // CA2=111, CB2=111
}

#[test]
fn test_beam_integration_draws_lines() {
    let (mut via, _) = make_via();
    let input = Input::new();
    let mut render = RenderContext::default();

    via.write(0x3, 0xFF).unwrap(); // DDRA output
    via.write(0xC, 0xEE).unwrap(); // no /ZERO, no /BLANK
    via.write(0x0, 0x04).unwrap(); // MUX on, select brightness
    via.write(0x1, 0x40).unwrap(); // brightness = 0x40
    via.write(0x0, 0x00).unwrap(); // MUX on, select Y velocity; RAMP on
    via.write(0x1, 0x20).unwrap(); // velocity = 0x20 on both axes

    update(&mut via, 4, &input, &mut render);

    assert_eq!(render.lines.len(), 4);
    let pos = via.beam_position();
    assert!((pos.x - 1.0).abs() < 1e-6); // 4 * 0x20/128
    assert!((pos.y - 1.0).abs() < 1e-6);
}

#[test]
fn test_zero_line_snaps_beam_to_origin() {
    let (mut via, _) = make_via();
    let input = Input::new();
    let mut render = RenderContext::default();

    via.write(0x3, 0xFF).unwrap();
    via.write(0xC, 0xEC).unwrap(); // CA2=110: /ZERO asserted, CB2=111
    via.write(0x0, 0x00).unwrap();
    via.write(0x1, 0x40).unwrap();

    update(&mut via, 8, &input, &mut render);

    // Snapped to the origin every cycle, so the position never accumulates
    // past a single cycle's worth of integration
    let pos = via.beam_position();
    assert!(pos.x <= 0x40 as f32 / 128.0 + 1e-6);
    assert!(pos.y <= 0x40 as f32 / 128.0 + 1e-6);
}

#[test]
fn test_blank_suppresses_drawing() {
    let (mut via, _) = make_via();
    let input = Input::new();
    let mut render = RenderContext::default();

    via.write(0x3, 0xFF).unwrap();
    via.write(0xC, 0xCE).unwrap(); // CB2=110: /BLANK asserted, CA2=111
    via.write(0x0, 0x04).unwrap();
    via.write(0x1, 0x40).unwrap(); // brightness
    via.write(0x0, 0x00).unwrap();
    via.write(0x1, 0x20).unwrap(); // velocity

    update(&mut via, 4, &input, &mut render);

    assert!(render.lines.is_empty());
    assert!(via.beam_position().x > 0.0); // beam still moved
}

#[test]
fn test_shift_register_pattern_gates_blank() {
    let (mut via, _) = make_via();
    let input = Input::new();
    let mut render = RenderContext::default();

    via.write(0x3, 0xFF).unwrap();
    via.write(0xC, 0xEE).unwrap(); // /BLANK off via CB2
    via.write(0x0, 0x04).unwrap();
    via.write(0x1, 0x40).unwrap(); // brightness
    via.write(0x0, 0x00).unwrap();
    via.write(0x1, 0x20).unwrap(); // velocity

    // All-zero pattern: blanked for the 8 shifted bits
    via.write(0xA, 0x00).unwrap();
    update(&mut via, 8, &input, &mut render);
    assert!(render.lines.is_empty());

    // All-one pattern draws every cycle
    via.write(0xA, 0xFF).unwrap();
    update(&mut via, 8, &input, &mut render);
    assert_eq!(render.lines.len(), 8);
}

#[test]
fn test_comparator_bit_on_port_b_read() {
    let (mut via, _) = make_via();
    let mut input = Input::new();
    input.set_analog(1, 50);
    let mut render = RenderContext::default();
    update(&mut via, 0, &input, &mut render); // cache input

    via.write(0x3, 0xFF).unwrap();
    via.write(0x0, 0x02).unwrap(); // MUX select 1
    via.write(0x1, 10).unwrap(); // DAC = 10 < 50

    let port_b = via.read(0x0).unwrap();
    assert_eq!(port_b & 0x20, 0x20);

    via.write(0x1, 100).unwrap(); // DAC = 100 >= 50
    let port_b = via.read(0x0).unwrap();
    assert_eq!(port_b & 0x20, 0x00);
}

#[test]
fn test_digital_joystick_read_on_port_a() {
    let (mut via, _) = make_via();
    let mut input = Input::new();
    input.set_button(0, true); // active low
    let mut render = RenderContext::default();
    update(&mut via, 0, &input, &mut render);

    via.write(0x3, 0x00).unwrap(); // DDRA input
    via.write(0x0, 0x08).unwrap(); // BC1 high, BDIR low

    assert_eq!(via.read(0x1).unwrap(), 0xFE);

    // With BDIR high the port reads the latch, not the joystick
    via.write(0x0, 0x18).unwrap();
    assert_eq!(via.read(0x1).unwrap(), 0x00);
}

#[test]
fn test_aux_cntl_reconstruction_and_pb7() {
    let (mut via, _) = make_via();
    let input = Input::new();
    let mut render = RenderContext::default();

    via.write(0xB, 0x98).unwrap(); // PB7 enabled, shift mode 110, one-shots
    assert_eq!(via.read(0xB).unwrap(), 0x98);

    // Arming T1 with PB7 enabled drives /RAMP (port B bit 7 low)
    via.write(0x4, 0x04).unwrap();
    via.write(0x5, 0x00).unwrap();
    update(&mut via, 1, &input, &mut render);
    assert_eq!(via.read(0x0).unwrap() & 0x80, 0x00);

    // After expiry PB7 goes high again
    update(&mut via, 8, &input, &mut render);
    assert_eq!(via.read(0x0).unwrap() & 0x80, 0x80);
}

#[test]
fn test_aux_cntl_rejects_free_running_timer() {
    let (mut via, handler) = make_via();
    handler.set_policy(ErrorPolicy::Fail);
    assert!(via.write(0xB, 0x58).is_err()); // T1 free-running
    assert!(via.write(0xB, 0x18).is_ok());
}

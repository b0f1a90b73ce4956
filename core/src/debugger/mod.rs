//! Command-driven debugger and tracer. Owns the frame budget: when not
//! broken it executes instructions until the frame's cycles are spent,
//! wrapping each one with trace capture; when broken it processes one
//! command per frame from the startup queue or the interactive prompt.

pub mod breakpoints;
pub mod disasm;
pub mod hash;
pub mod symbols;
pub mod trace;

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fs;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::rc::Rc;

use crate::core::bus::MemoryBus;
use crate::core::engine::{AudioContext, EmuEvent, EmuEvents, Input, RenderContext};
use crate::core::error::{ErrorHandler, ErrorPolicy};
use crate::core::Cycles;
use crate::cpu::registers::CpuRegisters;
use crate::cpu::Cpu;
use crate::platform::{self, ConsoleColor, ScopedConsoleCtrlHandler};
use crate::sync::{ConnectionType, SyncProtocol};
use crate::via::Via;

use breakpoints::{BreakpointType, Breakpoints};
use disasm::disassemble_op;
use symbols::{parse_integral, SymbolTable};
use trace::{read_instruction, InstructionTraceInfo, TraceBuffer, MAX_TRACE_INSTRUCTIONS};

/// CPU clock: 6 MHz crystal divided by four.
const CPU_HZ: f64 = 6_000_000.0 / 4.0;

pub struct Debugger {
    bus: Rc<MemoryBus>,
    cpu: Rc<RefCell<Cpu>>,
    via: Rc<RefCell<Via>>,
    error_handler: Rc<ErrorHandler>,

    // Shared with the bus observers
    breakpoints: Rc<RefCell<Breakpoints>>,
    curr_trace: Rc<RefCell<Option<InstructionTraceInfo>>>,
    broken: Rc<Cell<bool>>,

    trace_buffer: TraceBuffer,
    symbol_table: SymbolTable,
    pending_commands: VecDeque<String>,
    last_command: String,
    trace_enabled: bool,
    color_enabled: bool,
    num_instructions_to_execute: Option<i64>,
    cpu_cycles_left: f64,
    cpu_cycles_total: Cycles,
    instruction_count: u64,
    instruction_hash: u32,
    instructions_this_frame: i64,
}

impl Debugger {
    pub fn new(
        bus: Rc<MemoryBus>,
        cpu: Rc<RefCell<Cpu>>,
        via: Rc<RefCell<Via>>,
        error_handler: Rc<ErrorHandler>,
    ) -> Self {
        let mut debugger = Self {
            bus,
            cpu,
            via,
            error_handler,
            breakpoints: Rc::new(RefCell::new(Breakpoints::default())),
            curr_trace: Rc::new(RefCell::new(None)),
            broken: Rc::new(Cell::new(false)),
            trace_buffer: TraceBuffer::new(MAX_TRACE_INSTRUCTIONS),
            symbol_table: SymbolTable::default(),
            pending_commands: VecDeque::new(),
            last_command: "step".to_string(),
            trace_enabled: true,
            color_enabled: false,
            num_instructions_to_execute: None,
            cpu_cycles_left: 0.0,
            cpu_cycles_total: 0,
            instruction_count: 0,
            instruction_hash: 0,
            instructions_this_frame: 0,
        };
        debugger.init();
        debugger
    }

    fn init(&mut self) {
        let curr_trace = Rc::clone(&self.curr_trace);
        let breakpoints = Rc::clone(&self.breakpoints);
        let broken = Rc::clone(&self.broken);
        let on_read = Box::new(move |address: u16, value: u8| {
            if let Some(trace) = curr_trace.borrow_mut().as_mut() {
                trace.add_memory_access(address, value as u16, true);
            }
            for bp in breakpoints.borrow().at_address(address) {
                if bp.enabled
                    && matches!(bp.kind, BreakpointType::Read | BreakpointType::ReadWrite)
                {
                    broken.set(true);
                    println!("Watchpoint hit at ${address:04x} (read value ${value:02x})");
                }
            }
        });

        let curr_trace = Rc::clone(&self.curr_trace);
        let breakpoints = Rc::clone(&self.breakpoints);
        let broken = Rc::clone(&self.broken);
        let on_write = Box::new(move |address: u16, value: u8| {
            if let Some(trace) = curr_trace.borrow_mut().as_mut() {
                trace.add_memory_access(address, value as u16, false);
            }
            for bp in breakpoints.borrow().at_address(address) {
                if bp.enabled
                    && matches!(bp.kind, BreakpointType::Write | BreakpointType::ReadWrite)
                {
                    broken.set(true);
                    println!("Watchpoint hit at ${address:04x} (write value ${value:02x})");
                }
            }
        });

        self.bus.register_callbacks(on_read, on_write);

        // Commands to run before the first interactive prompt
        if let Ok(text) = fs::read_to_string("startup.txt") {
            for line in text.lines() {
                if !line.is_empty() {
                    self.pending_commands.push_back(line.to_string());
                }
            }
        }
    }

    /// Breakpoints survive a machine reset on purpose.
    pub fn reset(&mut self) {
        self.cpu_cycles_left = 0.0;
        self.cpu_cycles_total = 0;
        self.trace_buffer.clear();
        *self.curr_trace.borrow_mut() = None;
    }

    pub fn break_into_debugger(&mut self) {
        self.broken.set(true);
    }

    pub fn is_broken(&self) -> bool {
        self.broken.get()
    }

    pub fn queue_command(&mut self, command: &str) {
        self.pending_commands.push_back(command.to_string());
    }

    pub fn instruction_hash(&self) -> u32 {
        self.instruction_hash
    }

    pub fn instruction_count(&self) -> u64 {
        self.instruction_count
    }

    pub fn trace_buffer(&self) -> &TraceBuffer {
        &self.trace_buffer
    }

    pub fn symbol_table_mut(&mut self) -> &mut SymbolTable {
        &mut self.symbol_table
    }

    pub fn breakpoints(&self) -> Rc<RefCell<Breakpoints>> {
        Rc::clone(&self.breakpoints)
    }

    pub fn set_trace_enabled(&mut self, enabled: bool) {
        self.trace_enabled = enabled;
    }

    /// Advance the machine by one frame, or process one debugger command if
    /// broken. Returns `Ok(false)` when the user quit.
    pub fn frame_update(
        &mut self,
        frame_time: f64,
        input: &Input,
        events: &EmuEvents,
        render: &mut RenderContext,
        audio: &mut AudioContext,
        sync: &mut dyn SyncProtocol,
    ) -> crate::core::error::EmuResult<bool> {
        self.instructions_this_frame = 0;

        for event in events {
            if matches!(event, EmuEvent::BreakIntoDebugger) {
                self.broken.set(true);
            }
        }

        if self.broken.get() || !self.pending_commands.is_empty() {
            let command = match self.pending_commands.pop_front() {
                Some(pending) => {
                    println!("{pending}");
                    pending
                }
                None => {
                    let prompt = format!(
                        "${:04x} ({})>",
                        self.cpu.borrow().registers().pc,
                        self.last_command
                    );
                    match platform::read_line(&prompt) {
                        Some(line) => line,
                        None => return Ok(false), // EOF quits
                    }
                }
            };
            let networked = !sync.is_standalone();
            if !self.dispatch_command(&command, input, render, audio, networked) {
                return Ok(false);
            }
        } else {
            let ctrl_c = ScopedConsoleCtrlHandler::new();
            let networked = !sync.is_standalone();

            self.cpu_cycles_left += CPU_HZ * frame_time;
            while self.cpu_cycles_left > 0.0 {
                if ctrl_c.take() {
                    self.broken.set(true);
                }

                let pc = self.cpu.borrow().registers().pc;
                let hit = self
                    .breakpoints
                    .borrow()
                    .at_address(pc)
                    .find(|bp| bp.kind == BreakpointType::Instruction)
                    .copied();
                if let Some(bp) = hit {
                    if bp.auto_delete {
                        self.breakpoints
                            .borrow_mut()
                            .remove(pc, BreakpointType::Instruction);
                        self.broken.set(true);
                    } else if bp.enabled {
                        println!("Breakpoint hit at ${:04x}", bp.address);
                        self.broken.set(true);
                    }
                }
                if self.broken.get() {
                    self.cpu_cycles_left = 0.0;
                    break;
                }

                let elapsed = self.execute_instruction_traced(input, render, audio, networked);
                self.cpu_cycles_total += elapsed;
                self.cpu_cycles_left -= elapsed as f64;

                if let Some(count) = &mut self.num_instructions_to_execute {
                    *count -= 1;
                    if *count <= 0 {
                        self.num_instructions_to_execute = None;
                        self.broken.set(true);
                    }
                }
                if self.broken.get() {
                    self.cpu_cycles_left = 0.0;
                    break;
                }
            }
        }

        self.sync_instruction_hash(sync);
        Ok(true)
    }

    /// One instruction with trace capture. Returns the effective cycles the
    /// VIA was advanced by (never zero, so frame budgeting always makes
    /// progress); faults break into the debugger and report zero.
    fn execute_instruction_traced(
        &mut self,
        input: &Input,
        render: &mut RenderContext,
        audio: &mut AudioContext,
        networked: bool,
    ) -> Cycles {
        if self.trace_enabled {
            // Decode with observers off so the lookahead stays out of the
            // trace slot.
            self.bus.set_callbacks_enabled(false);
            let instruction = read_instruction(self.cpu.borrow().registers().pc, &self.bus);
            let pre_regs = *self.cpu.borrow().registers();
            self.bus.set_callbacks_enabled(true);
            *self.curr_trace.borrow_mut() = Some(InstructionTraceInfo::new(instruction, pre_regs));
        }

        let result = {
            let (irq, firq) = {
                let via = self.via.borrow();
                (via.irq_enabled(), via.firq_enabled())
            };
            self.cpu.borrow_mut().execute_instruction(irq, firq)
        };

        match result {
            Ok(cycles) => {
                let slot = self.curr_trace.borrow_mut().take();
                if let Some(mut trace) = slot {
                    // Zero cycles means the CPU is parked waiting for an
                    // interrupt; nothing to log or hash.
                    if cycles > 0 {
                        trace.post_op_registers = *self.cpu.borrow().registers();
                        trace.elapsed_cycles = cycles;
                        if networked {
                            self.instruction_hash =
                                hash::hash_instruction_trace(self.instruction_hash, &trace);
                        }
                        self.trace_buffer.push(trace);
                        self.instructions_this_frame += 1;
                    }
                }
                if cycles > 0 {
                    self.instruction_count += 1;
                }

                let effective = if cycles == 0 { 10 } else { cycles };
                self.via.borrow_mut().update(effective, input, render, audio);
                effective
            }
            Err(error) => {
                *self.curr_trace.borrow_mut() = None;
                println!("Exception caught:\n{error}");
                self.print_last_op();
                self.broken.set(true);
                0
            }
        }
    }

    fn sync_instruction_hash(&mut self, sync: &mut dyn SyncProtocol) {
        if sync.is_standalone() {
            return;
        }

        let mut mismatch = false;
        if sync.is_server() {
            sync.send_value(ConnectionType::Server, self.instruction_hash);
        } else if sync.is_client() {
            let server_hash = sync.recv_value(ConnectionType::Client);
            mismatch = self.instruction_hash != server_hash;
        }

        if sync.is_client() {
            sync.send_flag(ConnectionType::Client, mismatch);
        } else if sync.is_server() {
            mismatch = sync.recv_flag(ConnectionType::Server);
        }

        if mismatch {
            log::error!(
                "instruction hash mismatch in last {} instructions",
                self.instructions_this_frame
            );
            self.broken.set(true);
            if sync.is_server() {
                sync.shutdown_server();
            } else {
                sync.shutdown_client();
            }
        }
    }

    /// Returns false when the command was `quit`.
    fn dispatch_command(
        &mut self,
        command: &str,
        input: &Input,
        render: &mut RenderContext,
        audio: &mut AudioContext,
        networked: bool,
    ) -> bool {
        let mut command = command.to_string();
        let mut tokens: Vec<String> = command.split_whitespace().map(str::to_string).collect();

        // An empty line repeats the last command
        if tokens.is_empty() {
            command = self.last_command.clone();
            tokens = command.split_whitespace().map(str::to_string).collect();
        }
        if tokens.is_empty() {
            return true;
        }

        let mut valid = true;
        match tokens[0].as_str() {
            "quit" | "q" => return false,

            "help" | "h" => print_help(),

            "continue" | "c" => {
                // Step over the current instruction first, otherwise a
                // breakpoint on it would re-trigger immediately
                self.execute_instruction_traced(input, render, audio, networked);
                self.broken.set(false);
            }

            "step" | "s" => {
                self.execute_instruction_traced(input, render, audio, networked);
                if tokens.len() > 1 {
                    match parse_integral(&tokens[1]) {
                        Some(count) => {
                            let remaining = count - 1;
                            if remaining > 0 {
                                self.num_instructions_to_execute = Some(remaining);
                                self.broken.set(false);
                            }
                        }
                        None => valid = false,
                    }
                } else {
                    self.print_last_op();
                }
            }

            "until" | "u" => match arg_address(&tokens) {
                Some(address) => {
                    if let Some(bp) = self
                        .breakpoints
                        .borrow_mut()
                        .add(BreakpointType::Instruction, address)
                    {
                        bp.auto_delete = true;
                    }
                    self.broken.set(false);
                }
                None => valid = false,
            },

            "break" | "b" => match arg_address(&tokens) {
                Some(address) => {
                    if self
                        .breakpoints
                        .borrow_mut()
                        .add(BreakpointType::Instruction, address)
                        .is_some()
                    {
                        println!("Added breakpoint at ${address:04x}");
                    } else {
                        valid = false;
                    }
                }
                None => valid = false,
            },

            "watch" | "rwatch" | "awatch" => match arg_address(&tokens) {
                Some(address) => {
                    let kind = match tokens[0].as_bytes()[0] {
                        b'w' => BreakpointType::Write,
                        b'r' => BreakpointType::Read,
                        _ => BreakpointType::ReadWrite,
                    };
                    if self.breakpoints.borrow_mut().add(kind, address).is_some() {
                        println!("Added watchpoint at ${address:04x}");
                    } else {
                        valid = false;
                    }
                }
                None => valid = false,
            },

            "delete" => match arg_index(&tokens) {
                Some(index) => match self.breakpoints.borrow_mut().remove_at_index(index) {
                    Some(bp) => {
                        println!("Deleted breakpoint {index} at ${:04x}", bp.address)
                    }
                    None => println!("Invalid breakpoint specified"),
                },
                None => valid = false,
            },

            "enable" => match arg_index(&tokens) {
                Some(index) => match self.breakpoints.borrow_mut().get_at_index_mut(index) {
                    Some(bp) => {
                        bp.enabled = true;
                        println!("Enabled breakpoint {index} at ${:04x}", bp.address);
                    }
                    None => println!("Invalid breakpoint specified"),
                },
                None => valid = false,
            },

            "disable" => match arg_index(&tokens) {
                Some(index) => match self.breakpoints.borrow_mut().get_at_index_mut(index) {
                    Some(bp) => {
                        bp.enabled = false;
                        println!("Disabled breakpoint {index} at ${:04x}", bp.address);
                    }
                    None => println!("Invalid breakpoint specified"),
                },
                None => valid = false,
            },

            "info" => match tokens.get(1).map(String::as_str) {
                Some("registers") | Some("reg") => {
                    print_registers(self.cpu.borrow().registers());
                }
                Some("break") => {
                    println!("Breakpoints:");
                    for (index, bp) in self.breakpoints.borrow().iter().enumerate() {
                        let color = if bp.enabled {
                            ConsoleColor::LightGreen
                        } else {
                            ConsoleColor::LightRed
                        };
                        let (set, reset) = self.color_codes(color);
                        println!(
                            "{set}{index:3}: ${:04x}\t{:<20}{}{reset}",
                            bp.address,
                            bp.kind.as_str(),
                            if bp.enabled { "Enabled" } else { "Disabled" }
                        );
                    }
                }
                _ => valid = false,
            },

            "print" | "p" => match arg_address(&tokens) {
                Some(address) => match self.bus.read(address) {
                    Ok(value) => println!("${address:04x} = ${value:02x} ({value})"),
                    Err(_) => println!("${address:04x} = INVALID_READ"),
                },
                None => valid = false,
            },

            "set" => {
                // Whitespace around '=' is allowed, so re-join the argument
                // tokens before splitting on '='
                valid = false;
                if tokens.len() > 1 {
                    let assignment: String = tokens[1..].concat();
                    let parts: Vec<&str> = assignment.split('=').collect();
                    if parts.len() == 2 {
                        if let (Some(address), Some(value)) =
                            (parse_integral(parts[0]), parse_integral(parts[1]))
                        {
                            if self.bus.write(address as u16, value as u8).is_err() {
                                println!("${:04x} = INVALID_WRITE", address as u16);
                            }
                            valid = true;
                        }
                    }
                }
            }

            "loadsymbols" => match tokens.get(1) {
                Some(file) if self.symbol_table.load_file(Path::new(file)).is_ok() => {
                    println!("Loaded symbols from {file}");
                }
                _ => valid = false,
            },

            "toggle" => match tokens.get(1).map(String::as_str) {
                Some("color") => {
                    self.color_enabled = !self.color_enabled;
                    println!(
                        "Color {}",
                        if self.color_enabled { "enabled" } else { "disabled" }
                    );
                }
                Some("trace") => {
                    self.trace_enabled = !self.trace_enabled;
                    println!(
                        "Trace {}",
                        if self.trace_enabled { "enabled" } else { "disabled" }
                    );
                }
                _ => valid = false,
            },

            "option" => match (tokens.get(1).map(String::as_str), tokens.get(2)) {
                (Some("errors"), Some(policy)) => match policy.as_str() {
                    "ignore" => self.error_handler.set_policy(ErrorPolicy::Ignore),
                    "log" => self.error_handler.set_policy(ErrorPolicy::Log),
                    "fail" => self.error_handler.set_policy(ErrorPolicy::Fail),
                    _ => valid = false,
                },
                _ => valid = false,
            },

            "trace" | "t" => valid = self.dump_trace(&tokens),

            _ => valid = false,
        }

        if valid {
            self.last_command = command;
        } else {
            println!("Invalid command: {command}");
        }
        true
    }

    fn dump_trace(&mut self, tokens: &[String]) -> bool {
        let mut num_lines: usize = 10;
        let mut out_file: Option<&String> = None;

        let mut i = 1;
        while i < tokens.len() {
            match tokens[i].as_str() {
                "-n" => {
                    i += 1;
                    match tokens.get(i).and_then(|t| parse_integral(t)) {
                        Some(n) if n >= 0 => num_lines = n as usize,
                        _ => return false,
                    }
                }
                "-f" => {
                    i += 1;
                    match tokens.get(i) {
                        Some(file) => out_file = Some(file),
                        None => return false,
                    }
                }
                _ => return false,
            }
            i += 1;
        }

        let mut file_out;
        let stdout = io::stdout();
        let mut stdout_lock;
        let (out, color): (&mut dyn Write, bool) = match out_file {
            Some(path) => match File::create(path) {
                Ok(file) => {
                    println!("Writing trace to {path}");
                    file_out = file;
                    (&mut file_out, false)
                }
                Err(_) => {
                    println!("Failed to create trace file");
                    return true;
                }
            },
            None => {
                stdout_lock = stdout.lock();
                (&mut stdout_lock, self.color_enabled)
            }
        };

        // Dumps can run to a million lines; Ctrl+C aborts the dump without
        // killing the process
        let ctrl_c = ScopedConsoleCtrlHandler::new();
        for trace in self.trace_buffer.peek_back(num_lines) {
            if print_op(out, trace, &self.symbol_table, color).is_err() {
                break;
            }
            if ctrl_c.take() {
                break;
            }
        }
        true
    }

    fn print_last_op(&self) {
        if self.trace_enabled {
            if let Some(last) = self.trace_buffer.back() {
                let stdout = io::stdout();
                let _ = print_op(
                    &mut stdout.lock(),
                    last,
                    &self.symbol_table,
                    self.color_enabled,
                );
            }
        }
    }

    fn color_codes(&self, color: ConsoleColor) -> (&'static str, &'static str) {
        if self.color_enabled {
            (color.ansi(), platform::ANSI_RESET)
        } else {
            ("", "")
        }
    }
}

fn arg_address(tokens: &[String]) -> Option<u16> {
    tokens.get(1).and_then(|t| parse_integral(t)).map(|v| v as u16)
}

fn arg_index(tokens: &[String]) -> Option<usize> {
    tokens
        .get(1)
        .and_then(|t| parse_integral(t))
        .and_then(|v| usize::try_from(v).ok())
}

fn compact_registers(regs: &CpuRegisters) -> String {
    format!(
        "A${:02x}|B${:02x}|X${:04x}|Y${:04x}|U${:04x}|S${:04x}|DP${:02x}|{}",
        regs.a,
        regs.b,
        regs.x,
        regs.y,
        regs.u,
        regs.s,
        regs.dp,
        regs.cc_string()
    )
}

fn print_registers(regs: &CpuRegisters) {
    println!(
        "A=${:02x} ({}) B=${:02x} ({}) D=${:04x} ({}) X=${:04x} ({}) \
         Y=${:04x} ({}) U=${:04x} S=${:04x} DP=${:02x} PC=${:04x} CC={}",
        regs.a,
        regs.a,
        regs.b,
        regs.b,
        regs.d(),
        regs.d(),
        regs.x,
        regs.x,
        regs.y,
        regs.y,
        regs.u,
        regs.s,
        regs.dp,
        regs.pc,
        regs.cc_string()
    );
}

fn print_op(
    out: &mut dyn Write,
    trace: &InstructionTraceInfo,
    symbols: &SymbolTable,
    color: bool,
) -> io::Result<()> {
    let op = disassemble_op(trace, symbols);
    let paint = |c: ConsoleColor| if color { c.ansi() } else { "" };
    let reset = if color { platform::ANSI_RESET } else { "" };
    writeln!(
        out,
        "{}[${:04x}] {}{:<10} {}{:<32} {}{:<40} {}{:2} {}{}{}",
        paint(ConsoleColor::Gray),
        trace.pre_op_registers.pc,
        paint(ConsoleColor::LightYellow),
        op.hex_instruction,
        paint(ConsoleColor::LightAqua),
        op.disasm_instruction,
        paint(ConsoleColor::LightGreen),
        op.comment,
        paint(ConsoleColor::LightPurple),
        trace.elapsed_cycles,
        paint(ConsoleColor::Gray),
        compact_registers(&trace.post_op_registers),
        reset
    )
}

fn print_help() {
    println!(
        "s[tep] [count]               step instruction [count] times\n\
         c[ontinue]                   continue running\n\
         u[ntil] <address>            run until address is reached\n\
         info reg[isters]             display register values\n\
         p[rint] <address>            display value at address\n\
         set <address>=<value>        set value at address\n\
         info break                   display breakpoints\n\
         b[reak] <address>            set instruction breakpoint at address\n\
         [ |r|a]watch <address>       set write/read/both watchpoint at address\n\
         delete <index>               delete breakpoint at index\n\
         disable <index>              disable breakpoint at index\n\
         enable <index>               enable breakpoint at index\n\
         loadsymbols <file>           load file with symbol/address definitions\n\
         toggle ...                   toggle input option\n\
           color                        colored output (slow)\n\
           trace                        disassembly trace\n\
         option ...                   set option\n\
           errors [ignore|log|fail]     error policy\n\
         t[race] [...]                display trace output\n\
           -n <num_lines>               display num_lines worth\n\
           -f <file_name>               output trace to file_name\n\
         q[uit]                       quit\n\
         h[elp]                       display this help text"
    );
}

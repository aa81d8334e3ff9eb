//! vm16 Emulator - CLI Entry Point
//!
//! Commands:
//! - `vm16-emu run <image>` - Run a program image
//! - `vm16-emu debug <image>` - Interactive debugger
//! - `vm16-emu disasm <image>` - Disassemble a program image
//! - `vm16-emu demo <name>` - Run a built-in demo with register dumps
//! - `vm16-emu test` - Built-in self-test

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vm16::cpu::{Event, Observer};
use vm16::{Config, Cpu, Memory, OpcodePolicy, Register};

#[derive(Parser)]
#[command(name = "vm16-emu")]
#[command(version = "0.1.0")]
#[command(about = "A byte-addressable 16-bit register VM")]
struct Cli {
    /// Log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a program until it leaves its image or the step budget runs out
    Run {
        /// Path to the program image (.bin raw, otherwise hex text)
        program: String,
        /// Maximum number of steps to run
        #[arg(short, long, default_value = "10000")]
        max_steps: u64,
        /// Print every executed instruction
        #[arg(short, long)]
        trace: bool,
        #[command(flatten)]
        machine: MachineArgs,
    },
    /// Interactive debugger
    Debug {
        /// Path to the program image
        program: String,
        #[command(flatten)]
        machine: MachineArgs,
    },
    /// Disassemble a program image
    Disasm {
        /// Path to the program image
        program: String,
    },
    /// Run a built-in demo (add, loop, stack), dumping state after each step
    Demo {
        /// Demo name; lists demos when omitted
        name: Option<String>,
        /// Save the demo's program image to this path instead of running it
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Run the built-in self-test
    Test,
}

/// Machine shape shared by `run` and `debug`.
#[derive(Args)]
struct MachineArgs {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<String>,
    /// Memory size in bytes (2..=65536)
    #[arg(long)]
    memory_size: Option<usize>,
    /// Lowest address the stack may grow down to
    #[arg(long)]
    stack_limit: Option<u16>,
    /// Skip unknown opcodes instead of faulting
    #[arg(long)]
    permissive: bool,
}

impl MachineArgs {
    fn resolve(&self) -> Config {
        let mut config = match &self.config {
            Some(path) => Config::load(path).unwrap_or_else(|e| {
                eprintln!("❌ Failed to load config: {}", e);
                std::process::exit(1);
            }),
            None => Config::default(),
        };

        if let Some(size) = self.memory_size {
            config.memory_size = size;
        }
        if let Some(limit) = self.stack_limit {
            config.stack_limit = limit;
        }
        if self.permissive {
            config.opcode_policy = OpcodePolicy::Permissive;
        }
        config
    }
}

/// Prints events as the CPU reports them.
struct PrintObserver {
    enabled: bool,
}

impl Observer for PrintObserver {
    fn on_event(&mut self, event: &Event) {
        if self.enabled {
            println!("{}", event);
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Run { program, max_steps, trace, machine }) => {
            run_program(&program, max_steps, trace, &machine.resolve());
        }
        Some(Commands::Debug { program, machine }) => {
            debug_program(&program, &machine.resolve());
        }
        Some(Commands::Disasm { program }) => {
            disassemble_file(&program);
        }
        Some(Commands::Demo { name, output }) => {
            run_demo(name.as_deref(), output.as_deref());
        }
        Some(Commands::Test) => {
            run_self_test();
        }
        None => {
            println!("vm16 Emulator v0.1.0");
            println!("A byte-addressable 16-bit register VM");
            println!();
            println!("Use --help for available commands");
            println!();
            list_demos();
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "vm16=debug",
        _ => "vm16=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_program(path: &str) -> Vec<u8> {
    let program = match vm16::load_image(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("❌ Failed to load image: {}", e);
            std::process::exit(1);
        }
    };

    if program.is_empty() {
        eprintln!("❌ No instructions to execute");
        std::process::exit(1);
    }

    println!("📂 Loaded {} bytes", program.len());
    program
}

fn build_memory(config: &Config, program: &[u8]) -> Memory {
    let mut memory = match config.memory() {
        Ok(m) => m,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = memory.load(0, program) {
        eprintln!("❌ Failed to load program: {}", e);
        std::process::exit(1);
    }
    memory
}

fn run_program(path: &str, max_steps: u64, trace: bool, config: &Config) {
    use vm16::program::dump::{dump_registers, view_memory, DEFAULT_WINDOW};

    println!("🔧 Running: {}", path);

    let program = load_program(path);
    let memory = build_memory(config, &program);
    let mut cpu = Cpu::with_config(memory, config.cpu()).with_observer(PrintObserver { enabled: trace });

    println!();
    println!("━━━ Execution ━━━");

    let mut steps = 0u64;
    while steps < max_steps && (cpu.register(Register::Ip) as usize) < program.len() {
        if let Err(e) = cpu.step() {
            eprintln!("❌ CPU fault at IP={:04X}: {}", cpu.register(Register::Ip), e);
            println!("{}", dump_registers(cpu.registers()));
            std::process::exit(1);
        }
        steps += 1;
    }

    println!();
    println!("━━━ Result ━━━");
    println!("Steps: {}", steps);
    println!("Cycles: {}", cpu.cycles);
    println!("{}", dump_registers(cpu.registers()));

    let sp = cpu.register(Register::Sp);
    if let Ok(view) = view_memory(cpu.memory(), sp, DEFAULT_WINDOW) {
        println!("Stack: {}", view);
    }

    if steps >= max_steps {
        println!();
        println!("⚠️  Reached step budget ({}). Use --max-steps to increase.", max_steps);
    }
}

#[cfg(feature = "tui")]
fn debug_program(path: &str, config: &Config) {
    println!("🔍 Loading: {}", path);

    let program = load_program(path);
    let memory = build_memory(config, &program);

    println!("🚀 Launching debugger...");
    println!();

    if let Err(e) = vm16::run_debugger(memory, config.cpu()) {
        eprintln!("❌ Debugger error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "tui"))]
fn debug_program(_path: &str, _config: &Config) {
    eprintln!("❌ Built without the `tui` feature");
    std::process::exit(1);
}

fn disassemble_file(path: &str) {
    println!("📖 Disassembling: {}", path);
    println!();

    let program = load_program(path);
    match vm16::disassemble(&program) {
        Ok(listing) => println!("{}", listing),
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }
}

fn list_demos() {
    println!("Demos:");
    for demo in vm16::program::demos::all() {
        println!("  {:<6} {}", demo.name, demo.about);
    }
}

fn run_demo(name: Option<&str>, output: Option<&str>) {
    use vm16::program::demos;
    use vm16::program::dump::{dump_registers, view_memory, DEFAULT_WINDOW};

    let Some(name) = name else {
        list_demos();
        return;
    };
    let Some(demo) = demos::by_name(name) else {
        eprintln!("❌ Unknown demo: {}", name);
        list_demos();
        std::process::exit(1);
    };

    if let Some(path) = output {
        if let Err(e) = vm16::save_image(path, &demo.program) {
            eprintln!("❌ Failed to save image: {}", e);
            std::process::exit(1);
        }
        println!("✓ Saved {} ({} bytes) to {}", demo.name, demo.program.len(), path);
        return;
    }

    let memory = match demo.memory() {
        Ok(m) => m,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };
    let mut cpu = Cpu::new(memory);
    let watch = demos::LOOP_COUNTER_ADDR.min((demo.memory_size - DEFAULT_WINDOW) as u16);

    println!("━━━ Demo: {} ({}) ━━━", demo.name, demo.about);
    println!("{}", dump_registers(cpu.registers()));

    for _ in 0..demo.steps {
        match cpu.step() {
            Ok(Some(instr)) => println!("cycle ↓ {}", instr),
            Ok(None) => println!("cycle ↓ (ignored)"),
            Err(e) => {
                eprintln!("❌ {}", e);
                std::process::exit(1);
            }
        }
        println!("{}", dump_registers(cpu.registers()));
        let sp = cpu.register(Register::Sp);
        for addr in [watch, sp] {
            if let Ok(view) = view_memory(cpu.memory(), addr, DEFAULT_WINDOW) {
                println!("{}", view);
            }
        }
    }
}

fn run_self_test() {
    use vm16::program::demos;
    use vm16::CpuError;

    println!("━━━ vm16 Self-Test ━━━");
    println!();

    let mut passed = 0;
    let mut failed = 0;
    let mut check = |label: &str, ok: bool, detail: String| {
        if ok {
            println!("{}... ✓", label);
            passed += 1;
        } else {
            println!("{}... ✗ {}", label, detail);
            failed += 1;
        }
    };

    // Test 1: add demo
    let demo = demos::add();
    let result = demo.memory().map(Cpu::new).map(|mut cpu| {
        let _ = cpu.run_for(demo.steps);
        cpu.register(Register::Acc)
    });
    check("ADD wraps to 0xBE01", result == Ok(0xBE01), format!("{:?}", result));

    // Test 2: loop demo
    let demo = demos::counting_loop();
    let result = demo.memory().map(Cpu::new).map(|mut cpu| {
        let _ = cpu.run_for(demo.steps);
        (
            cpu.memory().read16(demos::LOOP_COUNTER_ADDR).ok(),
            cpu.register(Register::Ip),
        )
    });
    check(
        "Loop counts to 3",
        result == Ok((Some(3), demo.program.len() as u16)),
        format!("{:?}", result),
    );

    // Test 3: stack demo
    let demo = demos::stack();
    let result = demo.memory().map(Cpu::new).map(|mut cpu| {
        let sp = cpu.register(Register::Sp);
        let _ = cpu.run_for(demo.steps);
        (cpu.register(Register::R1), cpu.register(Register::R2), cpu.register(Register::Sp) == sp)
    });
    check(
        "Stack is LIFO",
        result == Ok((0x4242, 0x5151, true)),
        format!("{:?}", result),
    );

    // Test 4: unknown opcode faults
    let result = Memory::new(16).map(Cpu::new).map(|mut cpu| {
        let _ = cpu.memory_mut().write8(0, 0xFF);
        cpu.step()
    });
    check(
        "Unknown opcode faults",
        result == Ok(Err(CpuError::InvalidOpcode(0xFF))),
        format!("{:?}", result),
    );

    println!();
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Results: {} passed, {} failed", passed, failed);

    if failed == 0 {
        println!("✓ All tests passed!");
    } else {
        std::process::exit(1);
    }
}

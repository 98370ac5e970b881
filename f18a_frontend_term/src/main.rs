//! Terminal host for the f18a node emulator: command line, signal wiring,
//! terminal mode switching and the run loop.

mod signals;
mod term;

use f18a_core::{Action, Node, TermSwitch};

use std::path::Path;
use std::process;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn usage(prog: &str) {
    eprintln!("usage: {} [options] <image>", prog);
    eprintln!("   -h, --help           display this message");
    eprintln!("   -v, --version        display the version and exit");
    eprintln!("   -g, --graphics       enable graphical display window");
    eprintln!("   -d, --debug-boot     enter debugger on boot");
}

fn main() {
    process::exit(run_main());
}

fn run_main() -> i32 {
    let args: Vec<String> = std::env::args().collect();
    let prog = &args[0];

    let mut debug_boot = false;
    let mut image: Option<&str> = None;

    for arg in &args[1..] {
        match arg.as_str() {
            "-h" | "--help" => {
                usage(prog);
                return 0;
            }
            "-v" | "--version" => {
                println!("f18a {}", VERSION);
                return 0;
            }
            "-g" | "--graphics" => {
                eprintln!("graphics not supported in this build!");
                return 1;
            }
            "-d" | "--debug-boot" => debug_boot = true,
            opt if opt.starts_with('-') => {
                usage(prog);
                return 1;
            }
            positional => {
                if image.is_some() {
                    usage(prog);
                    return 1;
                }
                image = Some(positional);
            }
        }
    }

    let image = match image {
        Some(image) => image,
        None => {
            usage(prog);
            return 1;
        }
    };

    // Terminal and signals come up before the load so its status messages
    // land on a configured terminal.
    signals::install();
    let mut term = term::Term::init();

    let mut node = match Node::load_core(Path::new(image)) {
        Ok(node) => node,
        Err(err) => {
            eprintln!("{}", err);
            return 1;
        }
    };

    println!("welcome to f18a, version {}", VERSION);
    println!("press ctrl-c or send SIGINT for debugger, ctrl-d to exit.");

    run(&mut node, &mut term, debug_boot);

    drop(term);
    println!(" * f18a halted.");
    0
}

/// The outer run loop: step until told to stop, dropping into the debugger
/// on a BREAK and exiting cleanly on DIE. Opcodes are atomic; both flags
/// are only observed at step boundaries.
fn run(node: &mut Node, term: &mut term::Term, debug_boot: bool) {
    node.prime();

    let mut running = true;
    if debug_boot {
        running = node.debug(term);
    }
    println!("running...");
    term.run_mode();

    while running && !signals::should_die() {
        let action = node.step();
        if action == Action::Exit {
            running = false;
        }
        if action == Action::Break || signals::take_break() {
            term.dbg_mode();
            running = node.debug(term);
            if running {
                println!("running...");
            }
            term.run_mode();
        }
    }

    term.dbg_mode();
}

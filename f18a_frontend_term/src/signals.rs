//! Operator interrupt flags. SIGINT asks for the debugger, SIGQUIT asks
//! the emulator to die. The handlers are the only writers; the run loop is
//! the only reader and clearer.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};

static BREAK: AtomicBool = AtomicBool::new(false);
static DIE: AtomicBool = AtomicBool::new(false);

extern "C" fn int_handler(_signum: libc::c_int) {
    BREAK.store(true, Ordering::Relaxed);
}

extern "C" fn quit_handler(_signum: libc::c_int) {
    DIE.store(true, Ordering::Relaxed);
}

/// Install both handlers. Failure is not fatal: the emulator runs fine
/// without operator signals, it just can't be interrupted.
pub fn install() {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = int_handler as extern "C" fn(libc::c_int) as usize;
        libc::sigemptyset(&mut sa.sa_mask);
        sa.sa_flags = 0;
        if libc::sigaction(libc::SIGINT, &sa, std::ptr::null_mut()) != 0 {
            warn_no_signals();
        }

        sa.sa_sigaction = quit_handler as extern "C" fn(libc::c_int) as usize;
        if libc::sigaction(libc::SIGQUIT, &sa, std::ptr::null_mut()) != 0 {
            warn_no_signals();
        }
    }
}

fn warn_no_signals() {
    eprintln!(
        "error setting signal handler: {}",
        io::Error::last_os_error()
    );
    eprintln!("continuing without signal support...");
}

/// Consume a pending BREAK request. The flag is sticky until read here, so
/// an interrupt between steps is never lost.
pub fn take_break() -> bool {
    BREAK.swap(false, Ordering::Relaxed)
}

pub fn should_die() -> bool {
    DIE.load(Ordering::Relaxed)
}

//! Terminal mode control. The emulator runs with echo off and non-blocking
//! input; the debugger wants an ordinary cooked, blocking terminal. Both
//! settings are absolute, so switching is idempotent. The terminal's VQUIT
//! character is rebound to Ctrl-D so the operator can request termination
//! without a core-dumping keystroke.

use f18a_core::TermSwitch;

const CTRL_D: libc::cc_t = 0x04;

pub struct Term {
    orig: libc::termios,
}

impl Term {
    /// Capture the terminal state and rebind VQUIT. The saved state is
    /// restored on drop.
    pub fn init() -> Term {
        unsafe {
            let mut orig: libc::termios = std::mem::zeroed();
            libc::tcgetattr(libc::STDIN_FILENO, &mut orig);

            let mut cooked = orig;
            cooked.c_cc[libc::VQUIT] = CTRL_D;
            libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, &cooked);

            Term { orig }
        }
    }

    fn apply(&self, term: &libc::termios) {
        unsafe {
            libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, term);
        }
    }
}

impl TermSwitch for Term {
    fn run_mode(&mut self) {
        let mut raw = self.orig;
        raw.c_cc[libc::VQUIT] = CTRL_D;
        raw.c_lflag &= !(libc::ECHO | libc::ICANON);
        raw.c_cc[libc::VMIN] = 0;
        raw.c_cc[libc::VTIME] = 0;
        self.apply(&raw);
    }

    fn dbg_mode(&mut self) {
        let mut cooked = self.orig;
        cooked.c_cc[libc::VQUIT] = CTRL_D;
        self.apply(&cooked);
    }
}

impl Drop for Term {
    fn drop(&mut self) {
        let orig = self.orig;
        self.apply(&orig);
    }
}

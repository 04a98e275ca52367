//! Interactive admin console that builds fault commands and sends them to
//! a running twin.
//!
//! The menu runs over any `BufRead`/`Write` pair, so tests drive it with
//! scripted input and an in-memory [`FaultSink`].

pub mod client;

use std::io::{self, BufRead, Write};

use serde::Serialize;

pub use client::{ConsoleError, HttpClient};

use crate::sim::fault::FaultKind;

/// Grid assets offered by the main menu, keyed by menu choice.
pub const GRID_TARGETS: [(&str, u32, &str); 3] = [
    ("1", 1, "Kariba Hydro Gen"),
    ("2", 2, "Marvel Substation"),
    ("3", 3, "Bulawayo Industry Feeder"),
];

/// Home targeted by the smart-home menu.
pub const DEMO_HOME_ID: u32 = 1;

const RULE: &str = "==================================================";

/// Payload of `POST /api/trigger_fault`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaultCommand {
    pub asset_id: u32,
    pub fault_type: FaultKind,
    pub duration: u64,
    pub is_home: bool,
}

impl FaultCommand {
    /// Operator-facing target name, e.g. `Grid Asset 2` or `Home 1`.
    pub fn target_label(&self) -> String {
        if self.is_home {
            format!("Home {}", self.asset_id)
        } else {
            format!("Grid Asset {}", self.asset_id)
        }
    }
}

/// Server verdict on a delivered command.
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// 200 with the server's `message`.
    Injected { message: String },
    /// Any other status with the raw body.
    Rejected { status: u16, body: String },
}

/// Where fault commands go.
pub trait FaultSink {
    /// Delivers one command.
    ///
    /// # Errors
    ///
    /// Returns an error when the server cannot be reached.
    fn send(&mut self, cmd: &FaultCommand) -> Result<SendOutcome, ConsoleError>;
}

enum Flow {
    Continue,
    Quit,
}

/// Maps a duration menu choice to seconds; anything unrecognized is 10 s.
pub fn duration_for_choice(choice: &str) -> u64 {
    match choice.trim() {
        "2" => 30,
        "3" => 60,
        _ => 10,
    }
}

/// Menu state machine.
pub struct Console<R, W, S> {
    input: R,
    out: W,
    sink: S,
}

impl<R: BufRead, W: Write, S: FaultSink> Console<R, W, S> {
    pub fn new(input: R, out: W, sink: S) -> Self {
        Self { input, out, sink }
    }

    /// Runs menus until the operator quits or input ends.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading input or writing output fails.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            if let Flow::Quit = self.main_menu()? {
                return Ok(());
            }
        }
    }

    /// Consumes the console, returning the sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Reads one trimmed line, or `None` at end of input.
    fn prompt(&mut self) -> io::Result<Option<String>> {
        write!(self.out, "\n> ")?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn print_header(&mut self) -> io::Result<()> {
        writeln!(self.out, "{RULE}")?;
        writeln!(self.out, "   POWER GRID SIMULATION - ADMIN CONTROL PANEL    ")?;
        writeln!(self.out, "{RULE}")?;
        writeln!(self.out, "WARNING: AUTHORIZED PERSONNEL ONLY")?;
        writeln!(self.out, "{}", "-".repeat(RULE.len()))
    }

    fn main_menu(&mut self) -> io::Result<Flow> {
        self.print_header()?;
        writeln!(self.out, "\nSELECT TARGET ASSET:")?;
        for (choice, _, name) in GRID_TARGETS {
            writeln!(self.out, "{choice}. {name}")?;
        }
        writeln!(self.out, "4. Simulate Smart Home Faults")?;
        writeln!(self.out, "q. Quit")?;

        let Some(choice) = self.prompt()? else {
            return Ok(Flow::Quit);
        };
        if choice.eq_ignore_ascii_case("q") {
            return Ok(Flow::Quit);
        }
        if choice == "4" {
            return self.smart_home_menu();
        }
        match GRID_TARGETS.iter().find(|(c, _, _)| *c == choice) {
            Some(&(_, asset_id, _)) => self.grid_fault_menu(asset_id),
            None => {
                writeln!(self.out, "Invalid selection.")?;
                Ok(Flow::Continue)
            }
        }
    }

    fn grid_fault_menu(&mut self, asset_id: u32) -> io::Result<Flow> {
        writeln!(self.out, "\nSELECT FAULT TYPE:")?;
        writeln!(self.out, "1. Voltage Dip (Sag)")?;
        writeln!(self.out, "2. Voltage Spike (Swell)")?;
        writeln!(self.out, "3. Zero Voltage (Trip)")?;

        let Some(choice) = self.prompt()? else {
            return Ok(Flow::Quit);
        };
        let kind = match choice.as_str() {
            "1" => FaultKind::VoltageDip,
            "2" => FaultKind::VoltageSpike,
            "3" => FaultKind::ZeroVoltage,
            _ => {
                writeln!(self.out, "Invalid selection.")?;
                return Ok(Flow::Continue);
            }
        };
        self.send_fault(asset_id, kind, false)
    }

    fn smart_home_menu(&mut self) -> io::Result<Flow> {
        writeln!(self.out, "\n--- SMART HOME SIMULATION (ID: 14 Main St) ---")?;
        writeln!(self.out, "[A] Simulate Grid Surge (265V) -> Trigger Protection")?;
        writeln!(self.out, "[B] Simulate Appliance Wear (18A) -> Trigger Warning")?;
        writeln!(self.out, "[C] Cancel")?;

        let Some(choice) = self.prompt()? else {
            return Ok(Flow::Quit);
        };
        match choice.to_ascii_uppercase().as_str() {
            "A" => self.send_fault(DEMO_HOME_ID, FaultKind::GridSurge, true),
            "B" => self.send_fault(DEMO_HOME_ID, FaultKind::HomeWear, true),
            "C" => Ok(Flow::Continue),
            _ => {
                writeln!(self.out, "Invalid selection.")?;
                Ok(Flow::Continue)
            }
        }
    }

    fn send_fault(&mut self, asset_id: u32, kind: FaultKind, is_home: bool) -> io::Result<Flow> {
        writeln!(self.out, "\nSELECT DURATION:")?;
        writeln!(self.out, "1. 10 Seconds")?;
        writeln!(self.out, "2. 30 Seconds")?;
        writeln!(self.out, "3. 60 Seconds")?;

        let Some(choice) = self.prompt()? else {
            return Ok(Flow::Quit);
        };
        let cmd = FaultCommand {
            asset_id,
            fault_type: kind,
            duration: duration_for_choice(&choice),
            is_home,
        };

        writeln!(
            self.out,
            "\nSending command: {} -> {} ({}s)...",
            cmd.fault_type,
            cmd.target_label(),
            cmd.duration
        )?;
        match self.sink.send(&cmd) {
            Ok(SendOutcome::Injected { message }) => {
                writeln!(self.out, "\n[SUCCESS] FAULT INJECTED SUCCESSFULLY.")?;
                writeln!(self.out, "Server Response: {message}")?;
            }
            Ok(SendOutcome::Rejected { status, body }) => {
                writeln!(self.out, "\n[ERROR] Server returned {status}: {body}")?;
            }
            Err(e) => {
                writeln!(self.out, "\n[ERROR] Connection failed: {e}")?;
                writeln!(self.out, "Ensure the grid-twin server is running.")?;
            }
        }

        write!(self.out, "\nPress ENTER to continue...")?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(Flow::Quit);
        }
        Ok(Flow::Continue)
    }
}

// Keyboard teleop: W/S forward/back, A/D turn, 1/2/3 gait, R/F speed, Space stop, Q quit
// Note: like the runtime watchdog, if no movement key arrives within the input
// timeout the robot is told to stop, so a dropped key-up never leaves it walking.

use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use tracing::info;

use crate::bridge::Transport;
use crate::client::PuppyClient;
use crate::config::{TELEOP_INPUT_TIMEOUT, TELEOP_POLL, TELEOP_SPEEDS, TELEOP_YAW_RATES};
use crate::error::{Error, Result};
use crate::motion::Gait;

/// What the teleop loop should send next
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TeleopCommand {
    Drive { x: f64, yaw_rate_deg: f64, gait: Gait },
    Stop,
    Quit,
}

pub struct TeleopState {
    speed_idx: usize,
    gait: Gait,
    x: f64,
    yaw_rate_deg: f64,
    last_movement_input: Instant,
    timeout: Duration,
    // Last drive command sent, None while stopped
    sent: Option<(f64, f64, Gait)>,
}

impl TeleopState {
    pub fn new(timeout: Duration, now: Instant) -> Self {
        Self {
            speed_idx: 0,
            gait: Gait::default(),
            x: 0.0,
            yaw_rate_deg: 0.0,
            last_movement_input: now,
            timeout,
            sent: None,
        }
    }

    pub fn speed_label(&self) -> &'static str {
        ["LOW", "MED", "HIGH"][self.speed_idx]
    }

    pub fn gait(&self) -> Gait {
        self.gait
    }

    /// Handle a key press (or repeat)
    pub fn on_key(&mut self, code: KeyCode, now: Instant) -> Option<TeleopCommand> {
        match code {
            KeyCode::Char('w') => self.x = TELEOP_SPEEDS[self.speed_idx],
            KeyCode::Char('s') => self.x = -TELEOP_SPEEDS[self.speed_idx],
            KeyCode::Char('a') => self.yaw_rate_deg = TELEOP_YAW_RATES[self.speed_idx],
            KeyCode::Char('d') => self.yaw_rate_deg = -TELEOP_YAW_RATES[self.speed_idx],

            KeyCode::Char('1') => self.gait = Gait::Trot,
            KeyCode::Char('2') => self.gait = Gait::Amble,
            KeyCode::Char('3') => self.gait = Gait::Walk,

            KeyCode::Char('r') => {
                self.speed_idx = (self.speed_idx + 1).min(2);
                return None;
            }
            KeyCode::Char('f') => {
                self.speed_idx = self.speed_idx.saturating_sub(1);
                return None;
            }

            KeyCode::Char(' ') => return self.halt(),
            KeyCode::Char('q') | KeyCode::Esc => return Some(TeleopCommand::Quit),
            _ => return None,
        }
        self.last_movement_input = now;
        self.drive()
    }

    /// Called every poll tick; stops the robot once input goes stale
    pub fn on_idle(&mut self, now: Instant) -> Option<TeleopCommand> {
        if now.duration_since(self.last_movement_input) > self.timeout {
            self.halt()
        } else {
            None
        }
    }

    fn halt(&mut self) -> Option<TeleopCommand> {
        self.x = 0.0;
        self.yaw_rate_deg = 0.0;
        self.sent.take().map(|_| TeleopCommand::Stop)
    }

    fn drive(&mut self) -> Option<TeleopCommand> {
        if self.x == 0.0 && self.yaw_rate_deg == 0.0 {
            // Gait change while standing still: applied with the next drive
            return None;
        }
        let next = (self.x, self.yaw_rate_deg, self.gait);
        if self.sent == Some(next) {
            return None;
        }
        self.sent = Some(next);
        Some(TeleopCommand::Drive {
            x: self.x,
            yaw_rate_deg: self.yaw_rate_deg,
            gait: self.gait,
        })
    }
}

/// Run keyboard teleop until Q/Esc
pub async fn run_teleop<T: Transport>(client: &mut PuppyClient<T>) -> Result<()> {
    info!("Controls: W/S=forward/back, A/D=turn, 1/2/3=Trot/Amble/Walk, R/F=speed, Space=stop, Q=quit");

    enable_raw_mode()?;
    let result = teleop_loop(client).await;
    wind_down(client, result, disable_raw_mode()).await
}

/// Stop the robot, then report the first failure of loop, terminal restore or stop
async fn wind_down<T: Transport>(
    client: &mut PuppyClient<T>,
    result: Result<()>,
    restored: std::io::Result<()>,
) -> Result<()> {
    // Whatever happened, leave the robot standing still
    let stopped = client.move_stop().await;
    result.and(restored.map_err(Error::from)).and(stopped)
}

async fn teleop_loop<T: Transport>(client: &mut PuppyClient<T>) -> Result<()> {
    let mut state = TeleopState::new(TELEOP_INPUT_TIMEOUT, Instant::now());
    info!("Speed: {}, gait: {}", state.speed_label(), state.gait());

    loop {
        let mut command = None;
        if event::poll(TELEOP_POLL)? {
            if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
                let pressed = kind == KeyEventKind::Press || kind == KeyEventKind::Repeat;
                if pressed {
                    let (speed, gait) = (state.speed_label(), state.gait());
                    command = state.on_key(code, Instant::now());
                    if speed != state.speed_label() || gait != state.gait() {
                        info!("Speed: {}, gait: {}", state.speed_label(), state.gait());
                    }
                }
            }
        }
        if command.is_none() {
            command = state.on_idle(Instant::now());
        }

        match command {
            Some(TeleopCommand::Drive {
                x,
                yaw_rate_deg,
                gait,
            }) => client.move_robot(x, yaw_rate_deg, gait).await?,
            Some(TeleopCommand::Stop) => client.move_stop().await?,
            Some(TeleopCommand::Quit) => break,
            None => {}
        }
    }

    Ok(())
}

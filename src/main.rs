use std::time::Duration;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use puppy_remote::action::ActionGroup;
use puppy_remote::bridge::{RosbridgeTransport, Transport, ZenohTransport};
use puppy_remote::cli::{Cli, Command, TransportKind};
use puppy_remote::client::{inspect_topic, PuppyClient};
use puppy_remote::config::{CONNECT_TIMEOUT, SERVICE_TIMEOUT};
use puppy_remote::teleop::run_teleop;
use puppy_remote::Result;

#[tokio::main]
async fn main() {
    // Setup logging (set RUST_LOG=info or debug)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("puppy error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    if let Command::Actions = cli.command {
        for action in ActionGroup::ALL {
            println!("{}", action);
        }
        return Ok(());
    }

    match cli.transport {
        TransportKind::Rosbridge => {
            let transport =
                RosbridgeTransport::connect(&cli.rosbridge_url(), CONNECT_TIMEOUT, SERVICE_TIMEOUT)
                    .await?;
            execute(transport, cli.command).await
        }
        TransportKind::Zenoh => {
            let endpoint = cli.zenoh_endpoint();
            let transport = ZenohTransport::connect(Some(&endpoint), SERVICE_TIMEOUT).await?;
            execute(transport, cli.command).await
        }
    }
}

async fn execute<T: Transport>(transport: T, command: Command) -> Result<()> {
    if let Command::Inspect { topic } = &command {
        let info = inspect_topic(&transport, topic).await?;
        println!("{} : {}", info.topic, info.msg_type);
        println!("{}", serde_json::to_string_pretty(&info.details)?);
        transport.close().await?;
        return Ok(());
    }

    let mut robot = PuppyClient::connect(transport).await?;
    let result = match command {
        Command::Action { name, pause } => match name.parse::<ActionGroup>() {
            Ok(action) => robot.run_action_group(action, Some(pause)).await,
            Err(e) => {
                warn!("{}, sending it as a raw action group name", e);
                robot.run_named_action(&name, Some(pause)).await
            }
        },
        Command::Pose {
            roll,
            pitch,
            height,
            run_time,
        } => robot.set_pose(roll, pitch, height, run_time).await,
        Command::Stand { run_time } => robot.set_pose_stand(run_time).await,
        Command::LieDown { run_time } => robot.set_pose_lie_down(run_time).await,
        Command::Move {
            x,
            yaw_rate,
            gait,
            duration,
        } => drive_for(&mut robot, x, yaw_rate, gait, duration).await,
        Command::Stop => robot.move_stop().await,
        Command::Camera { frames } => print_frames(&mut robot, frames).await,
        Command::Teleop => run_teleop(&mut robot).await,
        Command::Actions | Command::Inspect { .. } => Ok(()),
    };

    // Release the bridge even when the command failed
    let finished = robot.finish().await;
    result.and(finished)
}

async fn drive_for<T: Transport>(
    robot: &mut PuppyClient<T>,
    x: f64,
    yaw_rate: f64,
    gait: puppy_remote::Gait,
    duration: Duration,
) -> Result<()> {
    robot.move_robot(x, yaw_rate, gait).await?;
    tokio::time::sleep(duration).await;
    robot.move_stop().await
}

async fn print_frames<T: Transport>(robot: &mut PuppyClient<T>, frames: usize) -> Result<()> {
    let mut stream = robot.image_raw_start().await?;
    for n in 0..frames {
        let Some(frame) = stream.next_frame().await else {
            warn!("Camera stream ended after {} frames", n);
            break;
        };
        let frame = frame?;
        info!(
            "frame {}: {}x{} {} ({} bytes decoded)",
            n,
            frame.width,
            frame.height,
            frame.encoding,
            frame.expected_len()
        );
    }
    robot.image_raw_stop().await
}

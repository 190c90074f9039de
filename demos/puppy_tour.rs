// Demo tour: canned actions, poses, a short walk, camera frames logged throughout.
// Usage: cargo run --example puppy_tour -- [ws://192.168.149.1:9090]
use std::time::Duration;

use puppy_remote::bridge::RosbridgeTransport;
use puppy_remote::config::{CONNECT_TIMEOUT, DEFAULT_HOST, DEFAULT_PORT, SERVICE_TIMEOUT};
use puppy_remote::{ActionGroup, Gait, PuppyClient};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| format!("ws://{}:{}", DEFAULT_HOST, DEFAULT_PORT));
    let transport = RosbridgeTransport::connect(&url, CONNECT_TIMEOUT, SERVICE_TIMEOUT).await?;
    let mut robot = PuppyClient::connect(transport).await?;

    let mut camera = robot.image_raw_start().await?;
    let frames = tokio::spawn(async move {
        let mut count = 0usize;
        while let Some(frame) = camera.next_frame().await {
            match frame {
                Ok(frame) => {
                    count += 1;
                    if count % 30 == 1 {
                        info!("camera {}x{} {}", frame.width, frame.height, frame.encoding);
                    }
                }
                Err(e) => warn!("bad frame: {}", e),
            }
        }
        count
    });

    // Actions
    let pause = Some(Duration::from_secs(4));
    robot.run_action_group(ActionGroup::Pee, pause).await?;
    robot.run_action_group(ActionGroup::Sit, pause).await?;
    robot.run_action_group(ActionGroup::StandFourLegs, pause).await?;

    // Poses
    robot.set_pose_lie_down(Duration::from_secs(1)).await?;
    robot.set_pose(0.0, 0.0, 70.0, Duration::from_secs(1)).await?;

    // Movement
    robot.set_pose_stand(Duration::from_secs(1)).await?;
    robot.move_robot(5.0, -5.0, Gait::Walk).await?;
    tokio::time::sleep(Duration::from_secs(2)).await;
    robot.move_stop().await?;
    tokio::time::sleep(Duration::from_secs(1)).await;

    robot.set_pose_lie_down(Duration::from_secs(1)).await?;
    robot.image_raw_stop().await?;
    robot.finish().await?;

    info!("Received {} camera frames", frames.await?);
    Ok(())
}

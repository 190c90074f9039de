// High-level client for the quadruped
//
// Combines the motion translator with a bridge transport: validates input,
// publishes the payloads in order and waits out the pacing delay after every
// open-loop motion. Methods take &mut self, so commands are issued by one
// caller strictly in sequence.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::action::ActionGroup;
use crate::bridge::Transport;
use crate::camera::CameraStream;
use crate::config::{
    DEFAULT_POSE_RUN_TIME, QUEUE_SIZE, SERVICE_RUN_ACTION_GROUP, TOPIC_GAIT, TOPIC_IMAGE_RAW,
    TOPIC_POSE, TOPIC_VELOCITY,
};
use crate::error::Result;
use crate::messages::{ActionGroupRequest, PoseParameters, VelocityCommand};
use crate::motion::{
    action_pause, compute_lie_down_pose, compute_pose_parameters, compute_stand_pose,
    pose_settle_delay, Gait, MotionLimits, MotionTranslator,
};

/// Topic type plus the field layout reported by the bridge
#[derive(Debug, Clone)]
pub struct TopicInfo {
    pub topic: String,
    pub msg_type: String,
    pub details: Value,
}

/// Look up a topic without setting up a session (no publishers, no stand-up)
pub async fn inspect_topic<T: Transport + ?Sized>(
    transport: &T,
    topic: &str,
) -> Result<TopicInfo> {
    let msg_type = transport.topic_type(topic).await?;
    let details = transport.message_details(&msg_type).await?;
    Ok(TopicInfo {
        topic: topic.to_string(),
        msg_type,
        details,
    })
}

pub struct PuppyClient<T: Transport> {
    transport: T,
    translator: MotionTranslator,
    limits: MotionLimits,
    image_type: String,
    streaming: bool,
}

impl<T: Transport> PuppyClient<T> {
    /// Set up publishers on `transport` and bring the robot to the standing pose
    pub async fn connect(transport: T) -> Result<Self> {
        Self::connect_with_limits(transport, MotionLimits::default()).await
    }

    /// Same as [`connect`](Self::connect) with custom input limits
    pub async fn connect_with_limits(transport: T, limits: MotionLimits) -> Result<Self> {
        info!("Setting up publishers...");
        for topic in [TOPIC_VELOCITY, TOPIC_POSE, TOPIC_GAIT] {
            let msg_type = transport.topic_type(topic).await?;
            debug!("{} is {}", topic, msg_type);
            transport.advertise(topic, &msg_type, QUEUE_SIZE).await?;
        }
        let image_type = transport.topic_type(TOPIC_IMAGE_RAW).await?;

        let mut client = Self {
            transport,
            translator: MotionTranslator::new(),
            limits,
            image_type,
            streaming: false,
        };
        client.set_pose_stand(DEFAULT_POSE_RUN_TIME).await?;
        info!("Robot ready");
        Ok(client)
    }

    /// Last pose sent to the robot
    pub fn current_pose(&self) -> &PoseParameters {
        self.translator.current_pose()
    }

    /// Run a canned action and wait `pause` (default 4 s) for it to play out
    pub async fn run_action_group(
        &mut self,
        action: ActionGroup,
        pause: Option<Duration>,
    ) -> Result<()> {
        self.run_request(ActionGroupRequest::for_action(action), pause)
            .await
    }

    /// Run an action group file by name, for actions outside the catalogue
    pub async fn run_named_action(&mut self, name: &str, pause: Option<Duration>) -> Result<()> {
        self.run_request(ActionGroupRequest::named(name), pause).await
    }

    async fn run_request(
        &mut self,
        request: ActionGroupRequest,
        pause: Option<Duration>,
    ) -> Result<()> {
        info!("Running action group {}", request.name);
        self.transport
            .call_service(SERVICE_RUN_ACTION_GROUP, serde_json::to_value(&request)?)
            .await?;
        // The service returns before the action finishes
        sleep(action_pause(pause)).await;
        Ok(())
    }

    /// Start walking: publishes pose (with the gait's x_shift), gait, then velocity.
    ///
    /// # Arguments
    /// * `x` - Forward speed (positive = forward)
    /// * `yaw_rate_deg` - Turn rate in deg/s
    /// * `gait` - Locomotion style
    pub async fn move_robot(&mut self, x: f64, yaw_rate_deg: f64, gait: Gait) -> Result<()> {
        self.limits.check_velocity(x, yaw_rate_deg)?;
        let plan = self.translator.plan_move(x, yaw_rate_deg, gait);
        info!("Move x={} yaw_rate={} deg/s gait={}", x, yaw_rate_deg, gait);

        self.publish(TOPIC_POSE, &plan.pose).await?;
        self.publish(TOPIC_GAIT, &plan.gait).await?;
        self.publish(TOPIC_VELOCITY, &plan.velocity).await
    }

    /// Stop walking
    pub async fn move_stop(&mut self) -> Result<()> {
        info!("Stopping");
        self.publish(TOPIC_VELOCITY, &VelocityCommand::zero()).await
    }

    /// Set an explicit body pose and wait for it to settle
    ///
    /// # Arguments
    /// * `roll_deg` - -30 to 30 degrees
    /// * `pitch_deg` - -30 to 30 degrees
    /// * `height_mm` - Leg height, 50 to 150 mm
    /// * `run_time` - Time to reach the pose
    pub async fn set_pose(
        &mut self,
        roll_deg: f64,
        pitch_deg: f64,
        height_mm: f64,
        run_time: Duration,
    ) -> Result<()> {
        let secs = run_time.as_secs_f64();
        self.limits.check_pose(roll_deg, pitch_deg, height_mm, secs)?;
        info!(
            "Pose roll={} pitch={} height={}mm over {:?}",
            roll_deg, pitch_deg, height_mm, run_time
        );
        self.apply_pose(compute_pose_parameters(roll_deg, pitch_deg, height_mm, secs))
            .await
    }

    pub async fn set_pose_stand(&mut self, run_time: Duration) -> Result<()> {
        let secs = run_time.as_secs_f64();
        self.limits.check_run_time(secs)?;
        info!("Standing over {:?}", run_time);
        self.apply_pose(compute_stand_pose(secs)).await
    }

    pub async fn set_pose_lie_down(&mut self, run_time: Duration) -> Result<()> {
        let secs = run_time.as_secs_f64();
        self.limits.check_run_time(secs)?;
        info!("Lying down over {:?}", run_time);
        self.apply_pose(compute_lie_down_pose(secs)).await
    }

    async fn apply_pose(&mut self, pose: PoseParameters) -> Result<()> {
        let pose = self.translator.apply_pose(pose);
        self.publish(TOPIC_POSE, &pose).await?;
        sleep(pose_settle_delay(&pose)).await;
        Ok(())
    }

    /// Subscribe to the camera
    pub async fn image_raw_start(&mut self) -> Result<CameraStream> {
        info!("Subscribing to {}", TOPIC_IMAGE_RAW);
        let rx = self
            .transport
            .subscribe(TOPIC_IMAGE_RAW, &self.image_type, QUEUE_SIZE)
            .await?;
        self.streaming = true;
        Ok(CameraStream::new(rx))
    }

    pub async fn image_raw_stop(&mut self) -> Result<()> {
        if self.streaming {
            info!("Unsubscribing from {}", TOPIC_IMAGE_RAW);
            self.transport.unsubscribe(TOPIC_IMAGE_RAW).await?;
            self.streaming = false;
        }
        Ok(())
    }

    /// Type and field layout of any topic on the bridge
    pub async fn inspect_topic(&self, topic: &str) -> Result<TopicInfo> {
        inspect_topic(&self.transport, topic).await
    }

    /// Release publishers and subscriptions and close the bridge
    pub async fn finish(mut self) -> Result<()> {
        info!("Finishing session");
        self.image_raw_stop().await?;
        for topic in [TOPIC_GAIT, TOPIC_POSE, TOPIC_VELOCITY] {
            if let Err(e) = self.transport.unadvertise(topic).await {
                warn!("Failed to unadvertise {}: {}", topic, e);
            }
        }
        self.transport.close().await?;
        Ok(())
    }

    async fn publish<P: Serialize>(&self, topic: &str, payload: &P) -> Result<()> {
        let msg = serde_json::to_value(payload)?;
        debug!("{} <- {}", topic, msg);
        self.transport.publish(topic, msg).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::mock::{Call, MockTransport};
    use crate::error::{BridgeError, Error, MotionError};
    use serde_json::json;

    async fn connected() -> (PuppyClient<MockTransport>, MockTransport) {
        let mock = MockTransport::new();
        let client = PuppyClient::connect(mock.clone()).await.unwrap();
        (client, mock)
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_advertises_and_stands() {
        let (client, mock) = connected().await;
        let calls = mock.calls();

        assert_eq!(
            &calls[..3],
            &[
                Call::Advertise {
                    topic: TOPIC_VELOCITY.to_string(),
                    msg_type: format!("mock{}", TOPIC_VELOCITY)
                },
                Call::Advertise {
                    topic: TOPIC_POSE.to_string(),
                    msg_type: format!("mock{}", TOPIC_POSE)
                },
                Call::Advertise {
                    topic: TOPIC_GAIT.to_string(),
                    msg_type: format!("mock{}", TOPIC_GAIT)
                },
            ]
        );
        assert_eq!(
            mock.published(TOPIC_POSE),
            vec![json!({
                "roll": 0.0, "pitch": 0.0, "yaw": 0.0, "height": -10.0,
                "x_shift": -0.5, "stance_x": 0.0, "stance_y": 0.0, "run_time": 1000
            })]
        );
        assert_eq!(*client.current_pose(), compute_stand_pose(1.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_waits_for_stand_pose() {
        let start = tokio::time::Instant::now();
        let _ = connected().await;
        assert_eq!(start.elapsed(), Duration::from_millis(1200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_trot_move_publishes_in_order() {
        let (mut client, mock) = connected().await;
        mock.clear();

        client.move_robot(5.0, -5.0, Gait::Trot).await.unwrap();

        let calls = mock.calls();
        assert_eq!(calls.len(), 3);
        let topics: Vec<_> = calls
            .iter()
            .map(|c| match c {
                Call::Publish { topic, .. } => topic.as_str(),
                other => panic!("unexpected call {:?}", other),
            })
            .collect();
        assert_eq!(topics, [TOPIC_POSE, TOPIC_GAIT, TOPIC_VELOCITY]);

        assert_eq!(mock.published(TOPIC_POSE)[0]["x_shift"], -0.6);
        assert_eq!(
            mock.published(TOPIC_GAIT)[0],
            json!({ "overlap_time": 0.2, "swing_time": 0.3, "clearance_time": 0.0, "z_clearance": 5.0 })
        );
        let velocity = &mock.published(TOPIC_VELOCITY)[0];
        assert_eq!(velocity["x"], 5.0);
        assert_eq!(velocity["y"], 0.0);
        assert!((velocity["yaw_rate"].as_f64().unwrap() - 0.0872665).abs() < 1e-6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_move_does_not_block() {
        let (mut client, _mock) = connected().await;
        let start = tokio::time::Instant::now();
        client.move_robot(10.0, 0.0, Gait::Walk).await.unwrap();
        client.move_stop().await.unwrap();
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_move_after_custom_pose_keeps_it() {
        let (mut client, mock) = connected().await;
        client
            .set_pose(10.0, 0.0, 120.0, Duration::from_millis(500))
            .await
            .unwrap();
        mock.clear();

        client.move_robot(5.0, 0.0, Gait::Amble).await.unwrap();
        let pose = &mock.published(TOPIC_POSE)[0];
        assert_eq!(pose["height"], -12.0);
        assert_eq!(pose["run_time"], 500);
        assert_eq!(pose["x_shift"], -0.9);
        assert!((pose["roll"].as_f64().unwrap() - 10f64.to_radians()).abs() < 1e-12);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_pose_waits_run_time_plus_margin() {
        let (mut client, mock) = connected().await;
        mock.clear();
        let start = tokio::time::Instant::now();

        client
            .set_pose(0.0, 0.0, 70.0, Duration::from_secs(2))
            .await
            .unwrap();

        assert_eq!(start.elapsed(), Duration::from_millis(2200));
        let pose = &mock.published(TOPIC_POSE)[0];
        assert_eq!(pose["height"], -7.0);
        assert_eq!(pose["run_time"], 2000);
        assert_eq!(pose["x_shift"], 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_lie_down_pose() {
        let (mut client, mock) = connected().await;
        mock.clear();
        client
            .set_pose_lie_down(Duration::from_secs(1))
            .await
            .unwrap();
        let pose = &mock.published(TOPIC_POSE)[0];
        assert_eq!(pose["height"], -5.0);
        assert_eq!(pose["x_shift"], 2.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_action_group_request_and_pause() {
        let (mut client, mock) = connected().await;
        mock.clear();
        let start = tokio::time::Instant::now();

        client.run_action_group(ActionGroup::Sit, None).await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_secs(4));

        client
            .run_named_action("dance", Some(Duration::from_millis(1500)))
            .await
            .unwrap();
        assert_eq!(start.elapsed(), Duration::from_millis(5500));

        assert_eq!(
            mock.calls(),
            vec![
                Call::CallService {
                    service: SERVICE_RUN_ACTION_GROUP.to_string(),
                    args: json!({ "name": "sit.d6ac" })
                },
                Call::CallService {
                    service: SERVICE_RUN_ACTION_GROUP.to_string(),
                    args: json!({ "name": "dance.d6ac" })
                },
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_action_skips_pause() {
        let (mut client, mock) = connected().await;
        mock.fail_service(SERVICE_RUN_ACTION_GROUP, "no such action");
        let start = tokio::time::Instant::now();

        let err = client
            .run_action_group(ActionGroup::Wave, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Bridge(BridgeError::ServiceFailed { .. })
        ));
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_out_of_range_rejected_before_publish() {
        let (mut client, mock) = connected().await;
        mock.clear();

        let err = client
            .set_pose(45.0, 0.0, 70.0, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Motion(MotionError::OutOfRange { field: "roll", .. })
        ));

        let err = client.move_robot(50.0, 0.0, Gait::Trot).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Motion(MotionError::OutOfRange { field: "x", .. })
        ));

        assert!(mock.calls().is_empty());
        assert_eq!(client.current_pose().x_shift, -0.5, "session pose untouched");
    }

    #[tokio::test(start_paused = true)]
    async fn test_camera_stream_and_finish() {
        let (mut client, mock) = connected().await;
        let mut stream = client.image_raw_start().await.unwrap();

        mock.inject(
            TOPIC_IMAGE_RAW,
            json!({ "height": 1, "width": 1, "encoding": "rgb8", "data": "AAAA" }),
        )
        .await;
        let frame = stream.next_frame().await.unwrap().unwrap();
        assert_eq!(frame.expected_len(), 3);

        mock.clear();
        client.finish().await.unwrap();
        assert_eq!(
            mock.calls(),
            vec![
                Call::Unsubscribe {
                    topic: TOPIC_IMAGE_RAW.to_string()
                },
                Call::Unadvertise {
                    topic: TOPIC_GAIT.to_string()
                },
                Call::Unadvertise {
                    topic: TOPIC_POSE.to_string()
                },
                Call::Unadvertise {
                    topic: TOPIC_VELOCITY.to_string()
                },
                Call::Close,
            ]
        );
        assert!(stream.next_frame().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_inspect_topic() {
        let (client, _mock) = connected().await;
        let info = client.inspect_topic(TOPIC_VELOCITY).await.unwrap();
        assert_eq!(info.msg_type, "mock/puppy_control/velocity");
        assert_eq!(info.details["typedefs"][0]["fieldnames"][2], "yaw_rate");
    }
}

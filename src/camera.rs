// Camera frames from the robot's image topic
// Pixel data arrives base64-encoded; decoding and display are up to the caller.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::warn;

use crate::error::Result;

/// Raw camera frame as published by the robot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CameraFrame {
    pub height: u32,
    pub width: u32,
    pub encoding: String,
    #[serde(default)]
    pub step: u32,
    #[serde(default)]
    pub is_bigendian: u8,
    /// Base64 pixel payload
    pub data: String,
}

impl CameraFrame {
    /// Bytes per pixel for the common encodings, if known
    pub fn bytes_per_pixel(&self) -> Option<u32> {
        match self.encoding.as_str() {
            "rgb8" | "bgr8" => Some(3),
            "rgba8" | "bgra8" => Some(4),
            "mono8" => Some(1),
            "mono16" => Some(2),
            _ => None,
        }
    }

    /// Length of the decoded pixel buffer.
    /// Uses `step` when the publisher filled it, otherwise assumes 3 bytes per pixel.
    pub fn expected_len(&self) -> usize {
        // Untrusted header fields: saturate
        let row = if self.step > 0 {
            self.step as usize
        } else {
            (self.width as usize).saturating_mul(self.bytes_per_pixel().unwrap_or(3) as usize)
        };
        row.saturating_mul(self.height as usize)
    }
}

/// Stream of frames from an image subscription
pub struct CameraStream {
    rx: mpsc::Receiver<Value>,
}

impl CameraStream {
    pub(crate) fn new(rx: mpsc::Receiver<Value>) -> Self {
        Self { rx }
    }

    /// Next frame, or `None` once the subscription ends
    pub async fn next_frame(&mut self) -> Option<Result<CameraFrame>> {
        let msg = self.rx.recv().await?;
        Some(serde_json::from_value(msg).map_err(|e| {
            warn!("Malformed camera frame: {}", e);
            e.into()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn frame_json() -> Value {
        json!({
            "header": { "seq": 3, "frame_id": "usb_cam" },
            "height": 480,
            "width": 640,
            "encoding": "rgb8",
            "is_bigendian": 0,
            "step": 1920,
            "data": "AAAA"
        })
    }

    #[test]
    fn test_expected_len_oversized_header() {
        let mut frame: CameraFrame = serde_json::from_value(frame_json()).unwrap();
        frame.step = 0;
        frame.encoding = "rgba8".to_string();
        frame.width = u32::MAX;
        frame.height = u32::MAX;
        assert_eq!(frame.expected_len(), usize::MAX);

        frame.height = 0;
        assert_eq!(frame.expected_len(), 0);
    }

    #[test]
    fn test_frame_from_image_message() {
        let frame: CameraFrame = serde_json::from_value(frame_json()).unwrap();
        assert_eq!(frame.height, 480);
        assert_eq!(frame.width, 640);
        assert_eq!(frame.encoding, "rgb8");
        assert_eq!(frame.data, "AAAA");
        assert_eq!(frame.expected_len(), 640 * 480 * 3);
    }

    #[test]
    fn test_expected_len_without_step() {
        let frame: CameraFrame = serde_json::from_value(json!({
            "height": 2, "width": 4, "encoding": "mono8", "data": ""
        }))
        .unwrap();
        assert_eq!(frame.step, 0);
        assert_eq!(frame.expected_len(), 8);

        let unknown = CameraFrame {
            encoding: "yuv422".to_string(),
            ..frame
        };
        assert_eq!(unknown.expected_len(), 24);
    }

    #[tokio::test]
    async fn test_stream_yields_frames_then_ends() {
        let (tx, rx) = mpsc::channel(2);
        let mut stream = CameraStream::new(rx);
        tx.send(frame_json()).await.unwrap();
        tx.send(json!({ "width": "wide" })).await.unwrap();
        drop(tx);

        assert_eq!(stream.next_frame().await.unwrap().unwrap().width, 640);
        assert!(stream.next_frame().await.unwrap().is_err());
        assert!(stream.next_frame().await.is_none());
    }
}

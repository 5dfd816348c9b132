use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde_derive::*;

use gestures::RawHand;

/// One recorded detector frame. A frame with no hands is valid (nothing in
/// view that moment).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordedFrame {
    #[serde(default)]
    pub hands: Vec<RawHand>,
}

/// Loads a JSON recording of detector frames.
pub fn load_replay<P: AsRef<Path>>(path: P) -> Result<Vec<RecordedFrame>, Box<dyn Error>> {
    let file = File::open(path)?;
    let frames = serde_json::from_reader(BufReader::new(file))?;

    Ok(frames)
}

/// Feeds recorded frames to the classifier, one per tick. Running out of
/// frames models the detector being stopped, so the caller must publish an
/// absent snapshot from then on.
pub struct ReplayFeed {
    frames: Vec<RecordedFrame>,
    cursor: usize,
}

impl ReplayFeed {
    pub fn new(frames: Vec<RecordedFrame>) -> ReplayFeed {
        ReplayFeed { frames, cursor: 0 }
    }

    pub fn advance(&mut self) -> Option<&RecordedFrame> {
        if self.cursor >= self.frames.len() {
            return None;
        }

        let frame = &self.frames[self.cursor];
        self.cursor += 1;
        Some(frame)
    }

    pub fn remaining(&self) -> usize {
        self.frames.len() - self.cursor
    }
}

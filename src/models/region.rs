use serde::{Deserialize, Serialize};

/// Screen region containing the in-game deposit code readout
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CaptureRegion {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

impl CaptureRegion {
    /// Create a new capture region from coordinates
    pub fn new(left: i32, top: i32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Validate region dimensions
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Get the end coordinates
    pub fn right(&self) -> i32 {
        self.left + self.width as i32
    }

    pub fn bottom(&self) -> i32 {
        self.top + self.height as i32
    }
}

impl Default for CaptureRegion {
    fn default() -> Self {
        // Deposit readout location on a 1920x1080 HUD
        Self {
            left: 1260,
            top: 310,
            width: 160,
            height: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_creation() {
        let region = CaptureRegion::new(100, 100, 200, 150);
        assert_eq!(region.left, 100);
        assert_eq!(region.top, 100);
        assert_eq!(region.width, 200);
        assert_eq!(region.height, 150);
    }

    #[test]
    fn test_region_validation() {
        let valid = CaptureRegion::new(0, 0, 100, 100);
        assert!(valid.is_valid());

        let zero_width = CaptureRegion::new(0, 0, 0, 100);
        assert!(!zero_width.is_valid());

        let zero_height = CaptureRegion::new(0, 0, 100, 0);
        assert!(!zero_height.is_valid());
    }

    #[test]
    fn test_region_bounds() {
        let region = CaptureRegion::new(100, 200, 300, 400);
        assert_eq!(region.right(), 400); // 100 + 300
        assert_eq!(region.bottom(), 600); // 200 + 400
    }

    #[test]
    fn test_region_default() {
        let region = CaptureRegion::default();
        assert_eq!(region.left, 1260);
        assert_eq!(region.top, 310);
        assert_eq!(region.width, 160);
        assert_eq!(region.height, 30);
        assert!(region.is_valid());
    }

    #[test]
    fn test_region_serialization() {
        let region = CaptureRegion::new(100, 200, 300, 400);
        let json = serde_json::to_string(&region).unwrap();
        let deserialized: CaptureRegion = serde_json::from_str(&json).unwrap();
        assert_eq!(region, deserialized);
    }
}

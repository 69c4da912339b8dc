/// Time primitives
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct Time(pub f64); // seconds

impl Time {
    pub fn seconds(self) -> f64 {
        self.0
    }

    pub fn after(self, delay_s: f64) -> Self {
        Time(self.0 + delay_s)
    }
}

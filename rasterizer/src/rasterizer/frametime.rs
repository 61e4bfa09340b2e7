use std::{fmt, ops::AddAssign, time::Duration};

/// Time spent in each pipeline stage, summed over every draw since the last clear.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct FrameTime {
    time_vertex_shader: Duration,
    time_rasterization: Duration,
    time_fragment_shader: Duration,
}

impl FrameTime {
    pub fn new(vertex: Duration, raster: Duration, frag: Duration) -> Self {
        Self {
            time_vertex_shader: vertex,
            time_rasterization: raster,
            time_fragment_shader: frag,
        }
    }
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn geometry_stage(&self) -> &Duration {
        &self.time_vertex_shader
    }

    pub fn rasterization_stage(&self) -> &Duration {
        &self.time_rasterization
    }

    pub fn fragment_stage(&self) -> &Duration {
        &self.time_fragment_shader
    }

    pub fn total(&self) -> Duration {
        *self.geometry_stage() + *self.rasterization_stage() + *self.fragment_stage()
    }
}

impl AddAssign for FrameTime {
    fn add_assign(&mut self, other: Self) {
        self.time_vertex_shader += other.time_vertex_shader;
        self.time_rasterization += other.time_rasterization;
        self.time_fragment_shader += other.time_fragment_shader;
    }
}

impl fmt::Display for FrameTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "geometry {:?}, raster {:?}, fragment {:?} (total {:?})",
            self.time_vertex_shader,
            self.time_rasterization,
            self.time_fragment_shader,
            self.total()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_accumulate() {
        let mut time = FrameTime::zero();
        time += FrameTime::new(
            Duration::from_millis(1),
            Duration::from_millis(2),
            Duration::from_millis(3),
        );
        time += FrameTime::new(
            Duration::from_millis(1),
            Duration::ZERO,
            Duration::from_millis(1),
        );
        assert_eq!(*time.geometry_stage(), Duration::from_millis(2));
        assert_eq!(time.total(), Duration::from_millis(8));
    }
}

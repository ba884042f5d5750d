/// CSS-style cubic bézier timing curve anchored at (0,0) and (1,1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

const NEWTON_ITERATIONS: usize = 8;
const BISECTION_ITERATIONS: usize = 32;
const EPSILON: f64 = 1e-7;

impl CubicBezier {
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    // Polynomial coefficients of one axis: a*s^3 + b*s^2 + c*s
    fn coefficients(p1: f64, p2: f64) -> (f64, f64, f64) {
        let c = 3.0 * p1;
        let b = 3.0 * (p2 - p1) - c;
        let a = 1.0 - c - b;
        (a, b, c)
    }

    fn curve_x(&self, s: f64) -> f64 {
        let (a, b, c) = Self::coefficients(self.x1, self.x2);
        ((a * s + b) * s + c) * s
    }

    fn curve_y(&self, s: f64) -> f64 {
        let (a, b, c) = Self::coefficients(self.y1, self.y2);
        ((a * s + b) * s + c) * s
    }

    fn curve_dx(&self, s: f64) -> f64 {
        let (a, b, c) = Self::coefficients(self.x1, self.x2);
        (3.0 * a * s + 2.0 * b) * s + c
    }

    /// Curve parameter whose x equals `x`.
    fn solve_x(&self, x: f64) -> f64 {
        let mut s = x;
        for _ in 0..NEWTON_ITERATIONS {
            let error = self.curve_x(s) - x;
            if error.abs() < EPSILON {
                return s;
            }
            let slope = self.curve_dx(s);
            if slope.abs() < 1e-6 {
                break;
            }
            s -= error / slope;
        }

        let (mut low, mut high) = (0.0, 1.0);
        s = x;
        for _ in 0..BISECTION_ITERATIONS {
            let value = self.curve_x(s);
            if (value - x).abs() < EPSILON {
                break;
            }
            if value < x {
                low = s;
            } else {
                high = s;
            }
            s = (low + high) / 2.0;
        }
        s
    }

    /// Eased progress for linear progress `t`, clamped to [0, 1].
    pub fn sample(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        self.curve_y(self.solve_x(t))
    }

    pub fn css(&self) -> String {
        format!("cubic-bezier({}, {}, {}, {})", self.x1, self.y1, self.x2, self.y2)
    }
}

pub const IOS_SPIN_EASING: CubicBezier = CubicBezier::new(0.15, 0.85, 0.25, 1.0);
pub const DEFAULT_SPIN_EASING: CubicBezier = CubicBezier::new(0.12, 0.78, 0.2, 1.0);

/// Host platform reported by the Telegram client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Platform {
    Ios,
    Android,
    Desktop,
    #[default]
    Unknown,
}

impl Platform {
    pub fn from_telegram(platform: &str) -> Self {
        match platform {
            "ios" => Self::Ios,
            "android" | "android_x" => Self::Android,
            "tdesktop" | "macos" | "web" | "weba" | "webk" | "unigram" => Self::Desktop,
            _ => Self::Unknown,
        }
    }

    /// Spin curve for this platform. Duration is the same everywhere.
    pub fn spin_easing(&self) -> CubicBezier {
        match self {
            Self::Ios => IOS_SPIN_EASING,
            _ => DEFAULT_SPIN_EASING,
        }
    }
}

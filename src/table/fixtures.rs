//! 测试用走时数据（定宽格式，均匀速度模型）

pub const DEPTHS: &[f64] = &[0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0];

pub const DISTANCES: &[f64] = &[
    0.0, 5.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 80.0, 100.0, 125.0, 150.0, 200.0, 250.0, 300.0,
    350.0, 400.0,
];

const VP: f64 = 6.0; // km/s
const VS: f64 = 3.5; // km/s

/// 生成一行定宽记录
pub fn record(primary: f64, secondary: f64, depth: f64, distance: f64) -> String {
    format!(
        "P {:>8.3} S {:>8.3} {:>3} {:>6}",
        primary, secondary, depth, distance
    )
}

/// 完整的测试走时数据
pub fn feed() -> String {
    let mut lines = Vec::with_capacity(DEPTHS.len() * DISTANCES.len());
    for &depth in DEPTHS {
        for &distance in DISTANCES {
            let path = (depth * depth + distance * distance).sqrt();
            lines.push(record(path / VP, path / VS, depth, distance));
        }
    }
    lines.join("\n")
}

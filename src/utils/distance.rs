//! 震源几何计算
//!
//! 将纬度换算为地心纬度后，用单位球面上的方向向量求弦长：
//! 震中距取弧长，震源距直接取弦长（深度远小于地球半径时成立）。

/// 地球半径 (km)
pub const EARTH_RADIUS_KM: f64 = 6370.291;

/// 地理纬度与地心纬度之差的系数 (11.55 角分)
const GEOCENTRIC_CORRECTION: f64 = 11.55 / 60.0;

/// 计算震中距与震源距
///
/// # 参数
/// * `quake_lat`, `quake_lon` - 震中纬度和经度（度）
/// * `quake_depth` - 震源深度 (km)
/// * `obs_lat`, `obs_lon` - 观测点纬度和经度（度）
///
/// # 返回值
/// * `(epicentral, hypocentral)` - 震中距和震源距（千米）
pub fn hypocentral_geometry(
    quake_lat: f64,
    quake_lon: f64,
    quake_depth: f64,
    obs_lat: f64,
    obs_lon: f64,
) -> (f64, f64) {
    let quake = unit_vector(quake_lat, quake_lon);
    let observer = unit_vector(obs_lat, obs_lon);

    // 震中距：弦长换算为圆心角，对跖点附近舍入误差可使弦长略超过 2
    let theta = 2.0 * (chord(quake, observer) / 2.0).min(1.0).asin();
    let epicentral = theta * EARTH_RADIUS_KM;

    // 震源沿半径方向内移
    let rd = (EARTH_RADIUS_KM - quake_depth) / EARTH_RADIUS_KM;
    let focus = [quake[0] * rd, quake[1] * rd, quake[2] * rd];
    let hypocentral = chord(focus, observer) * EARTH_RADIUS_KM;

    (epicentral, hypocentral)
}

/// 地心纬度（弧度）
#[inline]
fn geocentric_latitude(lat: f64) -> f64 {
    let phi = lat.to_radians();
    phi - GEOCENTRIC_CORRECTION.to_radians() * (2.0 * phi).sin()
}

#[inline]
fn unit_vector(lat: f64, lon: f64) -> [f64; 3] {
    let phi = geocentric_latitude(lat);
    let lambda = lon.to_radians();
    [
        phi.cos() * lambda.cos(),
        phi.cos() * lambda.sin(),
        phi.sin(),
    ]
}

#[inline]
fn chord(a: [f64; 3], b: [f64; 3]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}

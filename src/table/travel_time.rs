use crate::error::{Axis, PredictError, PredictResult};
use crate::models::TravelTimeSample;
use std::ops::Range;

// 定宽字段位置（字节偏移）
const PRIMARY_FIELD: Range<usize> = 2..10;
const SECONDARY_FIELD: Range<usize> = 13..21;
const DEPTH_FIELD: Range<usize> = 22..25;
const DISTANCE_FIELD: Range<usize> = 26..32;

/// P/S 波走时表
///
/// 深度 × 震中距的网格，构建后只读。格点可以不满，
/// 但查询所需的四个角点必须存在。
#[derive(Debug, Clone, PartialEq)]
pub struct TravelTimeTable {
    samples: Vec<TravelTimeSample>,
    depths: Vec<f64>,
    distances: Vec<f64>,
    /// 行 = 深度序号，列 = 震中距序号
    cells: Vec<Option<usize>>,
}

/// 单轴上的插值区间
#[derive(Debug, Clone, Copy)]
struct Bracket {
    lower: usize,
    upper: usize,
    fraction: f64,
}

impl TravelTimeTable {
    /// 解析定宽文本走时数据
    ///
    /// 任何一行解析失败都会使整张表作废。
    pub fn parse(feed: &str) -> PredictResult<Self> {
        let mut samples = Vec::new();

        for (number, line) in feed.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            let sample = parse_record(line).map_err(|reason| {
                tracing::error!("走时数据第 {} 行解析失败: {}", number + 1, reason);
                PredictError::MalformedRecord {
                    line: number + 1,
                    reason,
                }
            })?;
            samples.push((number + 1, sample));
        }

        if samples.is_empty() {
            return Err(PredictError::EmptyTable);
        }

        let depths = sorted_grid(samples.iter().map(|(_, s)| s.depth));
        let distances = sorted_grid(samples.iter().map(|(_, s)| s.distance));

        let mut cells = vec![None; depths.len() * distances.len()];
        for (index, (line, sample)) in samples.iter().enumerate() {
            let row = grid_position(&depths, sample.depth);
            let column = grid_position(&distances, sample.distance);
            let cell = &mut cells[row * distances.len() + column];

            if cell.is_some() {
                tracing::error!(
                    "走时数据第 {} 行重复: 深度 {} km, 震中距 {} km",
                    line,
                    sample.depth,
                    sample.distance
                );
                return Err(PredictError::MalformedRecord {
                    line: *line,
                    reason: format!(
                        "格点 (深度 {}, 震中距 {}) 重复",
                        sample.depth, sample.distance
                    ),
                });
            }
            *cell = Some(index);
        }

        let samples: Vec<TravelTimeSample> = samples.into_iter().map(|(_, s)| s).collect();

        tracing::info!(
            "走时表构建完成: {} 条记录, 深度 {} 档 [{}, {}] km, 震中距 {} 档 [{}, {}] km",
            samples.len(),
            depths.len(),
            depths[0],
            depths[depths.len() - 1],
            distances.len(),
            distances[0],
            distances[distances.len() - 1]
        );

        Ok(Self {
            samples,
            depths,
            distances,
            cells,
        })
    }

    /// 查询插值后的 P/S 波走时（秒）
    ///
    /// 超出表的深度或震中距范围时返回 `OutOfRange`，不做外推；
    /// 插值所需角点缺失时返回 `MissingCorner`。
    /// 查询值恰好落在格点上的轴不需要相邻格点，
    /// 因此对表中已有格点的查询不会返回 `MissingCorner`。
    pub fn travel_times(&self, depth: f64, distance: f64) -> PredictResult<(f64, f64)> {
        let y = bracket(&self.depths, depth, Axis::Depth)?;
        let x = bracket(&self.distances, distance, Axis::Distance)?;

        let s11 = self.corner(y.lower, x.lower)?;
        let s12 = self.corner(y.lower, x.upper)?;
        let s21 = self.corner(y.upper, x.lower)?;
        let s22 = self.corner(y.upper, x.upper)?;

        // 双线性插值，权重为对角子矩形面积占比
        let w11 = (1.0 - x.fraction) * (1.0 - y.fraction);
        let w12 = x.fraction * (1.0 - y.fraction);
        let w21 = (1.0 - x.fraction) * y.fraction;
        let w22 = x.fraction * y.fraction;

        let primary = w11 * s11.primary + w12 * s12.primary + w21 * s21.primary + w22 * s22.primary;
        let secondary = w11 * s11.secondary
            + w12 * s12.secondary
            + w21 * s21.secondary
            + w22 * s22.secondary;

        Ok((primary, secondary))
    }

    /// 深度范围 (km)
    pub fn depth_range(&self) -> (f64, f64) {
        (self.depths[0], self.depths[self.depths.len() - 1])
    }

    /// 震中距范围 (km)
    pub fn distance_range(&self) -> (f64, f64) {
        (self.distances[0], self.distances[self.distances.len() - 1])
    }

    pub fn depths(&self) -> &[f64] {
        &self.depths
    }

    pub fn distances(&self) -> &[f64] {
        &self.distances
    }

    pub fn samples(&self) -> &[TravelTimeSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    fn corner(&self, row: usize, column: usize) -> PredictResult<&TravelTimeSample> {
        self.cells[row * self.distances.len() + column]
            .map(|index| &self.samples[index])
            .ok_or(PredictError::MissingCorner {
                depth: self.depths[row],
                distance: self.distances[column],
            })
    }
}

/// 解析一行定宽记录
fn parse_record(line: &str) -> Result<TravelTimeSample, String> {
    Ok(TravelTimeSample {
        primary: parse_field(line, PRIMARY_FIELD, "P 波走时")?,
        secondary: parse_field(line, SECONDARY_FIELD, "S 波走时")?,
        depth: parse_field(line, DEPTH_FIELD, "深度")?,
        distance: parse_field(line, DISTANCE_FIELD, "震中距")?,
    })
}

fn parse_field(line: &str, field: Range<usize>, name: &str) -> Result<f64, String> {
    let raw = line
        .get(field.clone())
        .ok_or_else(|| format!("{} 字段 [{}..{}) 缺失", name, field.start, field.end))?;

    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|e| format!("{} 字段 {:?} 无法解析: {}", name, raw, e))?;

    if !value.is_finite() {
        return Err(format!("{} 字段 {:?} 不是有限值", name, raw));
    }

    Ok(value)
}

fn sorted_grid(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut grid: Vec<f64> = values.collect();
    grid.sort_by(f64::total_cmp);
    grid.dedup();
    grid
}

/// 网格中与 `value` 完全相等的位置（构建时使用，必定存在）
fn grid_position(grid: &[f64], value: f64) -> usize {
    grid.partition_point(|&g| g < value)
}

/// 求查询值所在区间
///
/// 下界为不大于查询值的最大格点，上界为严格大于查询值的最小格点。
/// 查询值恰好落在格点上（含最大格点）时区间退化为该格点，插值比例为 0。
fn bracket(grid: &[f64], value: f64, axis: Axis) -> PredictResult<Bracket> {
    let min = grid[0];
    let max = grid[grid.len() - 1];

    if !(min..=max).contains(&value) {
        tracing::debug!("{} {} 超出走时表范围 [{}, {}]", axis, value, min, max);
        return Err(PredictError::OutOfRange {
            axis,
            value,
            min,
            max,
        });
    }

    let successor = grid.partition_point(|&g| g <= value);
    let lower = successor - 1;

    if grid[lower] == value || successor == grid.len() {
        return Ok(Bracket {
            lower,
            upper: lower,
            fraction: 0.0,
        });
    }

    let fraction = (value - grid[lower]) / (grid[successor] - grid[lower]);
    Ok(Bracket {
        lower,
        upper: successor,
        fraction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::fixtures;

    fn table() -> TravelTimeTable {
        TravelTimeTable::parse(&fixtures::feed()).unwrap()
    }

    #[test]
    fn test_parse_grid() {
        let table = table();
        assert_eq!(table.len(), fixtures::DEPTHS.len() * fixtures::DISTANCES.len());
        assert_eq!(table.depths(), fixtures::DEPTHS);
        assert_eq!(table.distances(), fixtures::DISTANCES);
        assert_eq!(table.depth_range(), (0.0, 100.0));
        assert_eq!(table.distance_range(), (0.0, 400.0));
    }

    #[test]
    fn test_parse_record_offsets() {
        let line = fixtures::record(1.25, 2.5, 10.0, 5.0);
        assert_eq!(line, "P    1.250 S    2.500  10      5");
        let sample = parse_record(&line).unwrap();
        assert_eq!(
            sample,
            TravelTimeSample {
                depth: 10.0,
                distance: 5.0,
                primary: 1.25,
                secondary: 2.5,
            }
        );
    }

    #[test]
    fn test_blank_lines_ignored() {
        let feed = format!(
            "\n{}\n\n   \n{}\r\n",
            fixtures::record(0.0, 0.0, 0.0, 0.0),
            fixtures::record(1.0, 2.0, 0.0, 10.0)
        );
        let table = TravelTimeTable::parse(&feed).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.travel_times(0.0, 5.0).unwrap(), (0.5, 1.0));
    }

    #[test]
    fn test_grid_points_exact() {
        let table = table();
        for sample in table.samples() {
            let (p, s) = table.travel_times(sample.depth, sample.distance).unwrap();
            assert_eq!(p, sample.primary);
            assert_eq!(s, sample.secondary);
        }
    }

    #[test]
    fn test_interior_within_corners() {
        let table = table();
        for &(depth, distance) in &[(5.0, 7.5), (33.3, 123.4), (95.0, 399.0), (0.1, 0.1)] {
            let (p, s) = table.travel_times(depth, distance).unwrap();

            let y = bracket(table.depths(), depth, Axis::Depth).unwrap();
            let x = bracket(table.distances(), distance, Axis::Distance).unwrap();
            let corners = [
                table.corner(y.lower, x.lower).unwrap(),
                table.corner(y.lower, x.upper).unwrap(),
                table.corner(y.upper, x.lower).unwrap(),
                table.corner(y.upper, x.upper).unwrap(),
            ];

            let min_p = corners.iter().map(|c| c.primary).fold(f64::INFINITY, f64::min);
            let max_p = corners.iter().map(|c| c.primary).fold(f64::NEG_INFINITY, f64::max);
            let min_s = corners.iter().map(|c| c.secondary).fold(f64::INFINITY, f64::min);
            let max_s = corners.iter().map(|c| c.secondary).fold(f64::NEG_INFINITY, f64::max);

            assert!(p >= min_p && p <= max_p, "P {} not in [{}, {}]", p, min_p, max_p);
            assert!(s >= min_s && s <= max_s, "S {} not in [{}, {}]", s, min_s, max_s);
        }
    }

    #[test]
    fn test_bilinear_matches_area_weights() {
        // 双线性函数在网格内应被精确重现
        let feed = [
            fixtures::record(1.0, 2.0, 0.0, 0.0),
            fixtures::record(3.0, 6.0, 0.0, 10.0),
            fixtures::record(5.0, 10.0, 20.0, 0.0),
            fixtures::record(11.0, 22.0, 20.0, 10.0),
        ]
        .join("\n");
        let table = TravelTimeTable::parse(&feed).unwrap();

        let (x, y) = (4.0, 15.0);
        let (x1, x2, y1, y2) = (0.0, 10.0, 0.0, 20.0);
        let area = (x2 - x1) * (y2 - y1);
        let expected = ((x2 - x) * (y2 - y) * 1.0
            + (x - x1) * (y2 - y) * 3.0
            + (x2 - x) * (y - y1) * 5.0
            + (x - x1) * (y - y1) * 11.0)
            / area;

        let (p, s) = table.travel_times(y, x).unwrap();
        assert!((p - expected).abs() < 1e-12);
        assert!((s - 2.0 * expected).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_axis_is_linear() {
        let table = table();

        // 深度恰在格点上，只沿震中距线性插值
        let (p, _) = table.travel_times(20.0, 15.0).unwrap();
        let (p1, _) = table.travel_times(20.0, 10.0).unwrap();
        let (p2, _) = table.travel_times(20.0, 20.0).unwrap();
        assert!((p - (p1 + p2) / 2.0).abs() < 1e-12);

        // 最大格点没有后继
        let (depth_max, distance_max) = (table.depth_range().1, table.distance_range().1);
        assert!(table.travel_times(depth_max, distance_max).is_ok());
        assert!(table.travel_times(depth_max, 123.0).is_ok());
    }

    #[test]
    fn test_out_of_range() {
        let table = table();
        let cases = [
            (-0.5, 50.0, Axis::Depth),
            (100.5, 50.0, Axis::Depth),
            (10.0, -1.0, Axis::Distance),
            (10.0, 400.1, Axis::Distance),
        ];

        for (depth, distance, expected) in cases {
            match table.travel_times(depth, distance) {
                Err(PredictError::OutOfRange { axis, .. }) => assert_eq!(axis, expected),
                other => panic!("({}, {}) 应超出范围, got {:?}", depth, distance, other),
            }
        }

        assert!(matches!(
            table.travel_times(f64::NAN, 50.0),
            Err(PredictError::OutOfRange { axis: Axis::Depth, .. })
        ));
    }

    #[test]
    fn test_missing_corner() {
        // (10, 10) 缺失
        let feed = [
            fixtures::record(0.0, 0.0, 0.0, 0.0),
            fixtures::record(1.0, 2.0, 0.0, 10.0),
            fixtures::record(1.0, 2.0, 10.0, 0.0),
        ]
        .join("\n");
        let table = TravelTimeTable::parse(&feed).unwrap();

        assert_eq!(
            table.travel_times(5.0, 5.0),
            Err(PredictError::MissingCorner {
                depth: 10.0,
                distance: 10.0
            })
        );
        // 退化轴不需要缺失的角点
        assert!(table.travel_times(0.0, 5.0).is_ok());
        assert!(table.travel_times(5.0, 0.0).is_ok());
        assert!(table.travel_times(10.0, 0.0).is_ok());
    }

    #[test]
    fn test_malformed_record() {
        let feed = format!(
            "{}\nP    abc   S    2.500  10      5\n",
            fixtures::record(0.0, 0.0, 0.0, 0.0)
        );
        match TravelTimeTable::parse(&feed) {
            Err(PredictError::MalformedRecord { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected MalformedRecord, got {:?}", other),
        }

        // 行过短
        assert!(matches!(
            TravelTimeTable::parse("P    1.000 S    2.000  10"),
            Err(PredictError::MalformedRecord { line: 1, .. })
        ));

        // 非有限值
        assert!(matches!(
            TravelTimeTable::parse("P      NaN S    2.000  10      5"),
            Err(PredictError::MalformedRecord { line: 1, .. })
        ));
    }

    #[test]
    fn test_duplicate_record() {
        let feed = [
            fixtures::record(0.0, 0.0, 0.0, 0.0),
            fixtures::record(1.0, 2.0, 0.0, 10.0),
            fixtures::record(1.5, 2.5, 0.0, 10.0),
        ]
        .join("\n");
        assert!(matches!(
            TravelTimeTable::parse(&feed),
            Err(PredictError::MalformedRecord { line: 3, .. })
        ));
    }

    #[test]
    fn test_empty_feed() {
        assert_eq!(TravelTimeTable::parse(""), Err(PredictError::EmptyTable));
        assert_eq!(TravelTimeTable::parse("\n \n"), Err(PredictError::EmptyTable));
    }
}

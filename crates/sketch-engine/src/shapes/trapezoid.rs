use sketch_types::{EdgeMap, Point, PointMap, SharedPoint};

use crate::constraint::Constraint;
use crate::error::SketchError;
use crate::graphics::{labeled_points, GraphicsObject, Polyline};
use crate::internal::{
    EqualSegmentLengths, FixedSegmentLength, HorizontalLine, ParallelLines, VerticalLine,
};
use crate::svg::SvgTransform;

use super::{require_name, require_positive, Shape};

/// Which side the long base faces. Controls the initial axis alignment, the
/// orientation alias entries (`leftmostLeg` etc.), and the internal
/// horizontal/vertical pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LongBaseOrientation {
    Bottom,
    Top,
    Left,
    Right,
    #[default]
    None,
}

#[derive(Debug, Clone, Default)]
pub struct TrapezoidOptions {
    pub name: String,
    pub short_base_length: Option<f64>,
    pub long_base_length: Option<f64>,
    pub has_equal_length_legs: bool,
    pub long_base_orientation: LongBaseOrientation,
}

/// A trapezoid: two parallel bases (`longBase`, `shortBase`) joined by two
/// legs. The bases stay parallel through an internal constraint; lengths,
/// equal legs, and axis alignment are added per the options.
#[derive(Debug)]
pub struct Trapezoid {
    name: String,
    points: PointMap,
    edges: EdgeMap,
    internal: Vec<Box<dyn Constraint>>,
}

fn add_segment_alias(points: &mut PointMap, line: &str, start: &SharedPoint, end: &SharedPoint) {
    points.insert(format!("{line}.start"), start.clone());
    points.insert(format!("{line}.end"), end.clone());
}

impl Trapezoid {
    pub fn new(opts: TrapezoidOptions) -> Result<Self, SketchError> {
        require_name("Trapezoid", &opts.name)?;

        if let Some(short) = opts.short_base_length {
            require_positive("Trapezoid", "shortBaseLength", short)?;
        }
        if let Some(long) = opts.long_base_length {
            require_positive("Trapezoid", "longBaseLength", long)?;
        }
        if let (Some(short), Some(long)) = (opts.short_base_length, opts.long_base_length) {
            if short > long {
                return Err(SketchError::InvalidOption(format!(
                    "Trapezoid shortBaseLength ({short}) must not exceed longBaseLength ({long})"
                )));
            }
        }

        let orientation = opts.long_base_orientation;
        let long_init = opts.long_base_length.unwrap_or(4.0);
        let short_init = opts.short_base_length.unwrap_or(2.0);
        let depth = 1.0;

        let (long_base_start, long_base_end, short_base_start, short_base_end) = match orientation
        {
            LongBaseOrientation::Left => {
                let y_offset = (long_init - short_init) / 2.0;
                (
                    Point::shared(0.0, 0.0),
                    Point::shared(0.0, long_init),
                    Point::shared(depth, y_offset),
                    Point::shared(depth, y_offset + short_init),
                )
            }
            LongBaseOrientation::Right => {
                let y_offset = (long_init - short_init) / 2.0;
                (
                    Point::shared(depth, 0.0),
                    Point::shared(depth, long_init),
                    Point::shared(0.0, y_offset),
                    Point::shared(0.0, y_offset + short_init),
                )
            }
            LongBaseOrientation::Top => {
                let x_offset = (long_init - short_init) / 2.0;
                (
                    Point::shared(0.0, -depth),
                    Point::shared(long_init, -depth),
                    Point::shared(x_offset, 0.0),
                    Point::shared(x_offset + short_init, 0.0),
                )
            }
            LongBaseOrientation::Bottom | LongBaseOrientation::None => {
                let x_offset = (long_init - short_init) / 2.0;
                (
                    Point::shared(0.0, 0.0),
                    Point::shared(long_init, 0.0),
                    Point::shared(x_offset, -depth),
                    Point::shared(x_offset + short_init, -depth),
                )
            }
        };

        let leg1_start = &long_base_start;
        let leg1_end = &short_base_start;
        let leg2_start = &long_base_end;
        let leg2_end = &short_base_end;

        let mut points = PointMap::new();
        points.insert("longBaseStart", long_base_start.clone());
        points.insert("longBaseEnd", long_base_end.clone());
        points.insert("shortBaseStart", short_base_start.clone());
        points.insert("shortBaseEnd", short_base_end.clone());

        add_segment_alias(&mut points, "longBase", &long_base_start, &long_base_end);
        add_segment_alias(&mut points, "shortBase", &short_base_start, &short_base_end);
        add_segment_alias(&mut points, "leg1", leg1_start, leg1_end);
        add_segment_alias(&mut points, "leg2", leg2_start, leg2_end);

        match orientation {
            LongBaseOrientation::Bottom => {
                add_segment_alias(&mut points, "bottommostBase", &long_base_start, &long_base_end);
                add_segment_alias(&mut points, "topmostBase", &short_base_start, &short_base_end);
                add_segment_alias(&mut points, "leftmostLeg", leg1_start, leg1_end);
                add_segment_alias(&mut points, "rightmostLeg", leg2_start, leg2_end);
            }
            LongBaseOrientation::Top => {
                add_segment_alias(&mut points, "topmostBase", &long_base_start, &long_base_end);
                add_segment_alias(&mut points, "bottommostBase", &short_base_start, &short_base_end);
                add_segment_alias(&mut points, "leftmostLeg", leg1_start, leg1_end);
                add_segment_alias(&mut points, "rightmostLeg", leg2_start, leg2_end);
            }
            LongBaseOrientation::Left => {
                add_segment_alias(&mut points, "leftmostBase", &long_base_start, &long_base_end);
                add_segment_alias(&mut points, "rightmostBase", &short_base_start, &short_base_end);
                add_segment_alias(&mut points, "topmostLeg", leg1_start, leg1_end);
                add_segment_alias(&mut points, "bottommostLeg", leg2_start, leg2_end);
            }
            LongBaseOrientation::Right => {
                add_segment_alias(&mut points, "rightmostBase", &long_base_start, &long_base_end);
                add_segment_alias(&mut points, "leftmostBase", &short_base_start, &short_base_end);
                add_segment_alias(&mut points, "topmostLeg", leg1_start, leg1_end);
                add_segment_alias(&mut points, "bottommostLeg", leg2_start, leg2_end);
            }
            LongBaseOrientation::None => {}
        }

        let mut internal: Vec<Box<dyn Constraint>> = vec![Box::new(ParallelLines::new(
            long_base_start.clone(),
            long_base_end.clone(),
            short_base_start.clone(),
            short_base_end.clone(),
        ))];

        if let Some(long) = opts.long_base_length {
            internal.push(Box::new(FixedSegmentLength::new(
                long_base_start.clone(),
                long_base_end.clone(),
                long,
            )));
        }
        if let Some(short) = opts.short_base_length {
            internal.push(Box::new(FixedSegmentLength::new(
                short_base_start.clone(),
                short_base_end.clone(),
                short,
            )));
        }
        if opts.has_equal_length_legs {
            internal.push(Box::new(EqualSegmentLengths::new(
                leg1_start.clone(),
                leg1_end.clone(),
                leg2_start.clone(),
                leg2_end.clone(),
            )));
        }

        match orientation {
            LongBaseOrientation::Bottom | LongBaseOrientation::Top => {
                internal.push(Box::new(HorizontalLine::new(
                    long_base_start.clone(),
                    long_base_end.clone(),
                )));
                internal.push(Box::new(HorizontalLine::new(
                    short_base_start.clone(),
                    short_base_end.clone(),
                )));
            }
            LongBaseOrientation::Left | LongBaseOrientation::Right => {
                internal.push(Box::new(VerticalLine::new(
                    long_base_start.clone(),
                    long_base_end.clone(),
                )));
                internal.push(Box::new(VerticalLine::new(
                    short_base_start.clone(),
                    short_base_end.clone(),
                )));
            }
            LongBaseOrientation::None => {}
        }

        Ok(Self {
            name: opts.name,
            points,
            edges: EdgeMap::new(),
            internal,
        })
    }
}

impl Shape for Trapezoid {
    fn name(&self) -> &str {
        &self.name
    }

    fn points(&self) -> &PointMap {
        &self.points
    }

    fn edges(&self) -> &EdgeMap {
        &self.edges
    }

    fn internal_constraints(&self) -> &[Box<dyn Constraint>] {
        &self.internal
    }

    fn to_svg(&self, t: &SvgTransform) -> String {
        let ls = self.points.get("longBaseStart").unwrap().borrow();
        let le = self.points.get("longBaseEnd").unwrap().borrow();
        let ss = self.points.get("shortBaseStart").unwrap().borrow();
        let se = self.points.get("shortBaseEnd").unwrap().borrow();

        format!(
            "<polygon points=\"{},{} {},{} {},{} {},{}\" />",
            t.x(ls.x),
            t.y(ls.y),
            t.x(le.x),
            t.y(le.y),
            t.x(se.x),
            t.y(se.y),
            t.x(ss.x),
            t.y(ss.y)
        )
    }

    fn to_graphics(&self) -> GraphicsObject {
        let ls = self.points.get("longBaseStart").unwrap().borrow();
        let le = self.points.get("longBaseEnd").unwrap().borrow();
        let ss = self.points.get("shortBaseStart").unwrap().borrow();
        let se = self.points.get("shortBaseEnd").unwrap().borrow();

        let mut go = GraphicsObject::default();
        go.points = labeled_points(&self.name, &self.points);
        go.lines.push(Polyline {
            points: vec![
                (ls.x, ls.y).into(),
                (le.x, le.y).into(),
                (se.x, se.y).into(),
                (ss.x, ss.y).into(),
                (ls.x, ls.y).into(),
            ],
            label: Some(self.name.clone()),
        });
        go
    }
}

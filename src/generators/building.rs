use std::rc::Rc;

use super::SkipSource;
use crate::error::{Result, SceneError};
use crate::geometry::GeometryDescriptor;
use crate::material::{Color, Material};
use crate::scene::SceneNode;

/// Facade treatment of a building.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildingStyle {
    /// Roof slab, framed windows, balconies, and a tall door.
    Historic,
    /// Bare panes and a small door.
    Standard,
}

/// Inputs to [`building`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BuildingParams {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub x: f32,
    pub z: f32,
    pub color: Color,
    pub style: BuildingStyle,
    /// Facade length per window row or column.
    pub window_density: f32,
    /// Chance that a window cell is left blank.
    pub skip_probability: f32,
}

impl BuildingParams {
    pub const DEFAULT_COLOR: Color = Color::hex(0xeadbc8);
    pub const DEFAULT_WINDOW_DENSITY: f32 = 4.0;
    pub const DEFAULT_SKIP_PROBABILITY: f32 = 0.1;

    pub fn new(width: f32, height: f32, depth: f32) -> Self {
        Self {
            width,
            height,
            depth,
            x: 0.0,
            z: 0.0,
            color: Self::DEFAULT_COLOR,
            style: BuildingStyle::Standard,
            window_density: Self::DEFAULT_WINDOW_DENSITY,
            skip_probability: Self::DEFAULT_SKIP_PROBABILITY,
        }
    }

    /// Ground position of the building's center.
    pub fn at(mut self, x: f32, z: f32) -> Self {
        self.x = x;
        self.z = z;
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn style(mut self, style: BuildingStyle) -> Self {
        self.style = style;
        self
    }

    pub fn window_density(mut self, density: f32) -> Self {
        self.window_density = density;
        self
    }

    pub fn skip_probability(mut self, probability: f32) -> Self {
        self.skip_probability = probability;
        self
    }

    /// `(rows, cols)` of window candidates on the front face.
    pub fn window_grid(&self) -> (u32, u32) {
        let rows = (self.height / self.window_density).floor() as u32;
        let cols = (self.width / self.window_density).floor() as u32;
        (rows, cols)
    }

    fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("width", self.width),
            ("height", self.height),
            ("depth", self.depth),
            ("window_density", self.window_density),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(SceneError::InvalidDimension {
                    shape: "building",
                    field,
                    value,
                });
            }
        }
        if !(0.0..=1.0).contains(&self.skip_probability) {
            return Err(SceneError::InvalidParameter(format!(
                "building skip probability {} is outside [0, 1]",
                self.skip_probability
            )));
        }
        Ok(())
    }
}

struct WindowStyle {
    width: f32,
    height: f32,
    framed: bool,
}

impl BuildingStyle {
    fn window(self) -> WindowStyle {
        match self {
            BuildingStyle::Historic => WindowStyle {
                width: 1.8,
                height: 3.0,
                framed: true,
            },
            BuildingStyle::Standard => WindowStyle {
                width: 1.5,
                height: 2.0,
                framed: false,
            },
        }
    }

    fn door(self) -> (f32, f32, Color) {
        match self {
            BuildingStyle::Historic => (3.0, 5.0, Color::hex(0x5d3a23)),
            BuildingStyle::Standard => (2.0, 3.0, Color::hex(0x5c4033)),
        }
    }

    fn glass(self) -> Color {
        match self {
            BuildingStyle::Historic => Color::hex(0x334455),
            BuildingStyle::Standard => Color::hex(0x87cefa),
        }
    }
}

/// Builds a block with a window grid on its front (+Z) face.
///
/// The window grid has `rows * cols` candidate cells (see
/// [`BuildingParams::window_grid`]). Cells are visited row by row and each one
/// asks `skips` exactly once whether to stay blank.
pub fn building(params: &BuildingParams, skips: &mut dyn SkipSource) -> Result<SceneNode> {
    params.validate()?;
    let BuildingParams {
        width: w,
        height: h,
        depth: d,
        ..
    } = *params;

    let mut group = SceneNode::group("building").at(params.x, 0.0, params.z);

    let body = Material::standard(params.color).roughness(0.8).shared();
    group.add_child(
        SceneNode::mesh("body", GeometryDescriptor::cuboid(w, h, d), &body)?
            .at(0.0, h / 2.0, 0.0)
            .shadows(true, true),
    );

    if params.style == BuildingStyle::Historic {
        let roof = Material::standard(Color::hex(0xc0aa90)).roughness(0.7).shared();
        group.add_child(
            SceneNode::mesh("roof", GeometryDescriptor::cuboid(w + 1.0, 1.0, d + 1.0), &roof)?
                .at(0.0, h + 0.5, 0.0)
                .shadows(true, true),
        );
    }

    add_window_grid(&mut group, params, skips)?;

    if params.style == BuildingStyle::Historic {
        add_balconies(&mut group, params)?;
    }

    let (door_w, door_h, door_color) = params.style.door();
    let door = Material::standard(door_color)
        .roughness(0.5)
        .double_sided()
        .shared();
    group.add_child(
        SceneNode::mesh("door", GeometryDescriptor::plane(door_w, door_h), &door)?
            .at(0.0, door_h / 2.0, d / 2.0 + 0.1),
    );

    Ok(group)
}

fn add_window_grid(
    group: &mut SceneNode,
    params: &BuildingParams,
    skips: &mut dyn SkipSource,
) -> Result<()> {
    let (rows, cols) = params.window_grid();
    if rows == 0 || cols == 0 {
        return Ok(());
    }

    let style = params.style.window();
    let spacing_x = params.width / (cols + 1) as f32;
    let spacing_y = params.height / (rows + 1) as f32;
    let z = params.depth / 2.0;

    let frame = Material::standard(Color::hex(0xe0d5c0)).roughness(0.6).shared();
    let glass = Material::standard(params.style.glass())
        .roughness(0.3)
        .metalness(0.5)
        .transmission(0.6)
        .transparent()
        .double_sided()
        .depth_write(false)
        .depth_offset(-1.0, -1.0)
        .shared();

    for row in 0..rows {
        for col in 0..cols {
            if skips.skip(params.skip_probability) {
                continue;
            }
            let x = -params.width / 2.0 + spacing_x * (col + 1) as f32;
            let y = spacing_y * (row + 1) as f32;
            group.add_child(window_cell(&style, &frame, &glass)?.at(x, y, z));
        }
    }
    Ok(())
}

fn window_cell(
    style: &WindowStyle,
    frame: &Rc<Material>,
    glass: &Rc<Material>,
) -> Result<SceneNode> {
    let mut cell = SceneNode::group("window");
    if style.framed {
        cell.add_child(SceneNode::mesh(
            "window_frame",
            GeometryDescriptor::cuboid(style.width + 0.4, style.height + 0.4, 0.2),
            frame,
        )?);
    }
    cell.add_child(
        SceneNode::mesh(
            "window_pane",
            GeometryDescriptor::plane(style.width, style.height),
            glass,
        )?
        .at(0.0, 0.0, 0.11)
        .render_order(1),
    );
    Ok(cell)
}

fn add_balconies(group: &mut SceneNode, params: &BuildingParams) -> Result<()> {
    let (_, cols) = params.window_grid();
    let count = cols.min(3);
    let stone = Material::standard(Color::hex(0xd5d0c8)).roughness(0.7).shared();
    let spacing = params.width / (count + 1) as f32;

    for i in 0..count {
        let balcony = SceneNode::mesh("balcony", GeometryDescriptor::cuboid(3.0, 0.3, 1.2), &stone)?
            .at(
                -params.width / 2.0 + spacing * (i + 1) as f32,
                params.height / 3.0,
                params.depth / 2.0 + 0.6,
            )
            .with_child(
                SceneNode::mesh(
                    "balcony_railing",
                    GeometryDescriptor::cuboid(3.0, 1.0, 0.1),
                    &stone,
                )?
                .at(0.0, 0.65, 0.55),
            );
        group.add_child(balcony);
    }
    Ok(())
}

/// A historic building with an extra row of bracketed balconies at
/// mid-height, one per window column.
pub fn front_building(params: &BuildingParams, skips: &mut dyn SkipSource) -> Result<SceneNode> {
    let params = params.style(BuildingStyle::Historic);
    let mut group = building(&params, skips)?;

    let base = Material::standard(Color::hex(0xd5d0c8)).shared();
    let bracket = Material::standard(Color::hex(0xc0b5a5)).shared();
    let count = (params.width / 4.0).floor() as u32;

    for i in 0..count {
        let balcony = SceneNode::group("ornate_balcony")
            .at(
                -params.width / 2.0 + 3.0 + 4.0 * i as f32,
                params.height / 2.0,
                params.depth / 2.0 + 0.6,
            )
            .with_child(SceneNode::mesh(
                "balcony_base",
                GeometryDescriptor::cuboid(3.0, 0.3, 1.2),
                &base,
            )?)
            .with_child(
                SceneNode::mesh(
                    "balcony_support",
                    GeometryDescriptor::cuboid(0.2, 0.8, 0.2),
                    &bracket,
                )?
                .at(-1.2, -0.4, 0.4),
            );
        group.add_child(balcony);
    }
    Ok(group)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::NeverSkip;

    /// Skips cells according to a fixed script and counts how often it was asked.
    struct Scripted {
        script: Vec<bool>,
        asked: usize,
    }

    impl SkipSource for Scripted {
        fn skip(&mut self, _probability: f32) -> bool {
            let answer = self.script[self.asked % self.script.len()];
            self.asked += 1;
            answer
        }
    }

    #[test]
    fn grid_uses_density() {
        let params = BuildingParams::new(35.0, 22.0, 18.0);
        assert_eq!(params.window_grid(), (5, 8));
        assert_eq!(params.window_density(3.0).window_grid(), (7, 11));
    }

    #[test]
    fn full_grid_without_skips() {
        let params = BuildingParams::new(30.0, 20.0, 20.0);
        let node = building(&params, &mut NeverSkip).unwrap();
        assert_eq!(node.find_all("window").len(), 5 * 7);
        assert_eq!(node.find_all("window_pane").len(), 5 * 7);
    }

    #[test]
    fn skipped_cells_are_exactly_the_scripted_ones() {
        let params = BuildingParams::new(30.0, 20.0, 20.0).style(BuildingStyle::Historic);
        let mut skips = Scripted {
            script: vec![false, true, false, false, true],
            asked: 0,
        };
        let node = building(&params, &mut skips).unwrap();

        let (rows, cols) = params.window_grid();
        let candidates = (rows * cols) as usize;
        let skipped = (0..candidates).filter(|i| skips.script[i % 5]).count();

        assert_eq!(skips.asked, candidates);
        assert_eq!(node.find_all("window").len(), candidates - skipped);
    }

    #[test]
    fn standard_windows_are_bare_panes() {
        let node = building(&BuildingParams::new(20.0, 12.0, 10.0), &mut NeverSkip).unwrap();
        assert!(node.find("window_frame").is_none());
        assert!(node.find("roof").is_none());
        assert!(node.find("balcony").is_none());
        assert!(node.find("door").is_some());
    }

    #[test]
    fn historic_adds_roof_balconies_and_frames() {
        let params = BuildingParams::new(40.0, 22.0, 18.0).style(BuildingStyle::Historic);
        let node = building(&params, &mut NeverSkip).unwrap();
        assert!(node.find("roof").is_some());
        assert_eq!(node.find_all("balcony").len(), 3);
        assert_eq!(node.find_all("window_frame").len(), 5 * 10);
    }

    #[test]
    fn panes_are_biased_and_drawn_late() {
        let node = building(&BuildingParams::new(20.0, 12.0, 10.0), &mut NeverSkip).unwrap();
        let pane = node.find("window_pane").unwrap();
        let material = pane.material.as_ref().unwrap();
        assert_eq!(pane.render_order, 1);
        assert!(material.depth_offset.is_some());
        assert!(!material.depth_write);
        assert!(pane.transform.position.z > 0.0);
    }

    #[test]
    fn window_positions_follow_spacing() {
        let params = BuildingParams::new(12.0, 8.0, 6.0);
        let node = building(&params, &mut NeverSkip).unwrap();
        // 2 rows and 3 columns: spacing 3 horizontally and 8/3 vertically.
        let first = node.find("window").unwrap().transform.position;
        assert!((first.x - (-6.0 + 3.0)).abs() < 1e-5);
        assert!((first.y - 8.0 / 3.0).abs() < 1e-5);
        assert!((first.z - 3.0).abs() < 1e-5);
    }

    #[test]
    fn tiny_buildings_have_no_windows() {
        let node = building(&BuildingParams::new(3.0, 3.0, 3.0), &mut NeverSkip).unwrap();
        assert!(node.find("window").is_none());
    }

    #[test]
    fn rejects_non_positive_dimensions() {
        for params in [
            BuildingParams::new(0.0, 10.0, 10.0),
            BuildingParams::new(10.0, -1.0, 10.0),
            BuildingParams::new(10.0, 10.0, f32::INFINITY),
            BuildingParams::new(10.0, 10.0, 10.0).window_density(0.0),
            BuildingParams::new(10.0, 10.0, 10.0).skip_probability(1.5),
        ] {
            assert!(building(&params, &mut NeverSkip).is_err(), "{params:?}");
        }
    }

    #[test]
    fn front_building_adds_one_balcony_per_column() {
        let params = BuildingParams::new(25.0, 18.0, 15.0).at(-35.0, 50.0);
        let node = front_building(&params, &mut NeverSkip).unwrap();
        assert_eq!(node.find_all("ornate_balcony").len(), 6);
        assert!(node.find("roof").is_some());
    }
}

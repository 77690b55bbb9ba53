//! Lays the square out: every generator call with its coordinates, colours
//! and styles, sorted into the static and dynamic pools of a [`Scene`].

use crate::error::Result;
use crate::generators::{
    BuildingParams, BuildingStyle, CourtyardSide, DEFAULT_LAMP_ARMS, DetailLevel, SkipSource,
    building, cathedral, courtyard, front_building, monument, piazza_ground, piazza_pattern,
    street_lamp, tree,
};
use crate::material::Color;
use crate::quality::QualitySettings;
use crate::scene::{Environment, Scene, SceneNode, StructureKind};

/// Palazzi flanking the square: `(width, height, depth, x, z, colour)`.
const FLANK: [(f32, f32, f32, f32, f32, u32); 6] = [
    (35.0, 22.0, 18.0, 45.0, -15.0, 0xe5d5c5),
    (40.0, 22.0, 18.0, -45.0, -15.0, 0xe8d8c8),
    (30.0, 20.0, 20.0, 45.0, 30.0, 0xe0d0b0),
    (30.0, 20.0, 20.0, -45.0, 30.0, 0xe5d5b5),
    (30.0, 18.0, 18.0, 45.0, -60.0, 0xdbc8a0),
    (30.0, 18.0, 18.0, -45.0, -60.0, 0xe2d2b2),
];

/// Row across the square from the cathedral: `(width, height, depth, x, z)`.
const FRONT_ROW: [(f32, f32, f32, f32, f32); 3] = [
    (30.0, 20.0, 15.0, 0.0, 50.0),
    (25.0, 18.0, 15.0, -35.0, 50.0),
    (25.0, 18.0, 15.0, 35.0, 50.0),
];
const FRONT_ROW_COLOR: u32 = 0xe5d5c5;

pub const LAMP_POSITIONS: [(f32, f32); 8] = [
    (-30.0, 30.0),
    (30.0, 30.0),
    (-30.0, -30.0),
    (30.0, -30.0),
    (0.0, 60.0),
    (0.0, -60.0),
    (60.0, 0.0),
    (-60.0, 0.0),
];

pub const TREE_POSITIONS: [(f32, f32); 6] = [
    (35.0, 35.0),
    (-35.0, 35.0),
    (35.0, -35.0),
    (-35.0, -35.0),
    (60.0, 0.0),
    (-60.0, 0.0),
];

/// Knobs that vary the layout without changing what goes where.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneSettings {
    pub detail: DetailLevel,
    pub window_density: f32,
    pub skip_probability: f32,
    pub lamp_arms: u32,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            detail: DetailLevel::Full,
            window_density: BuildingParams::DEFAULT_WINDOW_DENSITY,
            skip_probability: BuildingParams::DEFAULT_SKIP_PROBABILITY,
            lamp_arms: DEFAULT_LAMP_ARMS,
        }
    }
}

/// Builds the whole square from [`SceneSettings`].
#[derive(Clone, Debug, Default)]
pub struct SceneAssembler {
    settings: SceneSettings,
}

impl SceneAssembler {
    pub fn new(settings: SceneSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &SceneSettings {
        &self.settings
    }

    /// Generates every structure and returns the finished scene.
    ///
    /// Window skips are drawn from `skips` in a fixed order (flank row, then
    /// front row, each building row-major), so equal skip sequences give
    /// identical scenes.
    pub fn build(&self, quality: &QualitySettings, skips: &mut dyn SkipSource) -> Result<Scene> {
        let settings = &self.settings;
        let mut scene = Scene::new(Environment::default());
        let mut pruned = 0;

        let mut add_static = |scene: &mut Scene, kind: StructureKind, mut node: SceneNode| {
            if !kind.keeps_shadows() {
                pruned += quality.apply_shadow_policy(&mut node);
            }
            scene.add_static(kind, node);
        };

        add_static(&mut scene, StructureKind::Ground, piazza_ground()?);
        add_static(&mut scene, StructureKind::Pattern, piazza_pattern()?);
        add_static(&mut scene, StructureKind::Monument, monument(settings.detail)?);
        add_static(&mut scene, StructureKind::Cathedral, cathedral(settings.detail)?);

        let mut flank = SceneNode::group("flank_buildings");
        for (width, height, depth, x, z, color) in FLANK {
            let params = self
                .building_params(width, height, depth)
                .at(x, z)
                .color(Color::hex(color))
                .style(BuildingStyle::Historic);
            flank.add_child(building(&params, skips)?);
        }
        add_static(&mut scene, StructureKind::BuildingRow, flank);

        let mut front = SceneNode::group("front_buildings");
        for (width, height, depth, x, z) in FRONT_ROW {
            let params = self
                .building_params(width, height, depth)
                .at(x, z)
                .color(Color::hex(FRONT_ROW_COLOR));
            front.add_child(front_building(&params, skips)?);
        }
        add_static(&mut scene, StructureKind::BuildingRow, front);

        add_static(&mut scene, StructureKind::Courtyard, courtyard(CourtyardSide::Right)?);
        add_static(&mut scene, StructureKind::Courtyard, courtyard(CourtyardSide::Left)?);

        let mut add_dynamic = |scene: &mut Scene, kind: StructureKind, mut node: SceneNode| {
            pruned += quality.apply_shadow_policy(&mut node);
            scene.add_dynamic(kind, node);
        };

        for (x, z) in LAMP_POSITIONS {
            add_dynamic(&mut scene, StructureKind::StreetLamp, street_lamp(x, z, settings.lamp_arms)?);
        }
        for (x, z) in TREE_POSITIONS {
            add_dynamic(&mut scene, StructureKind::Tree, tree(x, z)?);
        }

        log::info!(
            "assembled {} static and {} dynamic structures ({} nodes, {} point lights)",
            scene.statics().len(),
            scene.dynamics().len(),
            scene.node_count(),
            scene.point_lights().len(),
        );
        if pruned > 0 {
            log::debug!("shadow casting disabled on {pruned} heavy meshes");
        }

        Ok(scene)
    }

    fn building_params(&self, width: f32, height: f32, depth: f32) -> BuildingParams {
        BuildingParams::new(width, height, depth)
            .window_density(self.settings.window_density)
            .skip_probability(self.settings.skip_probability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{NeverSkip, RandomSkips};
    use crate::quality::CapabilityTier;

    fn standard() -> QualitySettings {
        QualitySettings::for_tier(CapabilityTier::Standard, 1.0)
    }

    #[test]
    fn pools_hold_the_expected_structures() {
        let scene = SceneAssembler::default()
            .build(&standard(), &mut NeverSkip)
            .unwrap();

        let kinds: Vec<_> = scene.statics().iter().map(|s| s.kind()).collect();
        assert_eq!(
            kinds,
            [
                StructureKind::Ground,
                StructureKind::Pattern,
                StructureKind::Monument,
                StructureKind::Cathedral,
                StructureKind::BuildingRow,
                StructureKind::BuildingRow,
                StructureKind::Courtyard,
                StructureKind::Courtyard,
            ]
        );
        assert!(scene.statics().iter().all(|s| s.node().is_static()));

        let lamps = scene
            .dynamics()
            .iter()
            .filter(|d| d.kind() == StructureKind::StreetLamp)
            .count();
        assert_eq!(lamps, LAMP_POSITIONS.len());
        assert_eq!(scene.dynamics().len(), LAMP_POSITIONS.len() + TREE_POSITIONS.len());
        assert!(scene.dynamics().iter().all(|d| !d.node().is_static()));
    }

    #[test]
    fn every_lamp_arm_contributes_a_light() {
        let scene = SceneAssembler::default()
            .build(&standard(), &mut NeverSkip)
            .unwrap();
        let expected = LAMP_POSITIONS.len() * DEFAULT_LAMP_ARMS as usize;
        assert_eq!(scene.point_lights().len(), expected);
    }

    #[test]
    fn reduced_tier_never_prunes_the_monument() {
        let reduced = QualitySettings::for_tier(CapabilityTier::Reduced, 1.0).with_shadow_vertex_budget(100);
        let scene = SceneAssembler::default()
            .build(&reduced, &mut RandomSkips::seeded(3))
            .unwrap();

        let (_, monument) = scene
            .structures()
            .find(|(kind, _)| *kind == StructureKind::Monument)
            .unwrap();
        let body = monument.find("elephant_body").unwrap();
        assert!(body.geometry.as_ref().unwrap().vertex_count() > 100);
        assert!(body.cast_shadow);

        let (_, cathedral) = scene
            .structures()
            .find(|(kind, _)| *kind == StructureKind::Cathedral)
            .unwrap();
        let dome = cathedral.find("dome").unwrap();
        assert!(!dome.cast_shadow);
    }

    #[test]
    fn reduced_tier_prunes_lamps_and_trees_too() {
        let budget = 50;
        let reduced = QualitySettings::for_tier(CapabilityTier::Reduced, 1.0).with_shadow_vertex_budget(budget);
        let scene = SceneAssembler::default()
            .build(&reduced, &mut NeverSkip)
            .unwrap();

        let heavy_casters = |node: &SceneNode| {
            let mut count = 0;
            node.visit(&mut |n| {
                let heavy = n.geometry.as_ref().is_some_and(|g| g.vertex_count() > budget);
                count += (heavy && n.cast_shadow) as usize;
            });
            count
        };

        let mut dynamic_meshes = 0;
        for dynamic in scene.dynamics() {
            assert_eq!(heavy_casters(dynamic.node()), 0, "{:?}", dynamic.kind());
            dynamic.node().visit(&mut |n| dynamic_meshes += n.geometry.is_some() as usize);
        }
        assert!(dynamic_meshes > 0);

        for stat in scene.statics() {
            if stat.kind() != StructureKind::Monument {
                assert_eq!(heavy_casters(stat.node()), 0, "{:?}", stat.kind());
            }
        }
    }

    #[test]
    fn window_density_changes_the_grid() {
        let dense = SceneAssembler::new(SceneSettings {
            window_density: 3.0,
            ..Default::default()
        });
        let plain = SceneAssembler::default();
        let count = |assembler: &SceneAssembler| {
            let scene = assembler.build(&standard(), &mut NeverSkip).unwrap();
            scene
                .structures()
                .map(|(_, node)| node.find_all("window").len())
                .sum::<usize>()
        };
        assert!(count(&dense) > count(&plain));
    }
}

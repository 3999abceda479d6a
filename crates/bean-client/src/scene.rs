//! Frame assembly: game state in, `FrameScene` out.
//!
//! Pure data shuffling so the draw rules are testable without a GPU:
//! ground always, every live remote player as a colored capsule with black
//! wires, the local bean only in third person.

use bean_core::{BeanCamera, CameraMode, LocalBean, PlayerId, Roster};
use glam::{Mat4, Vec4};

use crate::hud::{self, palette};
use crate::renderer::meshes::mesh_names;
use crate::renderer::{srgb_to_linear, FrameScene, SceneCamera, SceneInstance};
use crate::title::TitleScreen;

fn rgba(bytes: palette::Rgba) -> Vec4 {
    Vec4::from_array(srgb_to_linear(bytes))
}

fn bean_color(color: bean_core::BeanColor) -> Vec4 {
    rgba([color.r, color.g, color.b, color.a])
}

/// Title screen: overlay only, no 3D camera.
pub fn title_scene(title: &TitleScreen, window_width: f32, window_height: f32) -> FrameScene {
    let mut scene = FrameScene::new(palette::RAY_WHITE);
    scene.ui = hud::title_frame(title, window_width, window_height);
    scene
}

/// Gameplay: 3D world plus the controls panel.
pub fn gameplay_scene(
    camera: &BeanCamera,
    bean: &LocalBean,
    roster: &Roster,
    local_id: Option<PlayerId>,
    gamepad_active: bool,
    time: f32,
) -> FrameScene {
    let mut scene = FrameScene::new(palette::RAY_WHITE);
    scene.time = time;
    scene.camera = Some(SceneCamera {
        projection: camera.projection_matrix(),
        view: camera.view_matrix(),
        position: camera.position,
    });

    scene.instances.push(SceneInstance {
        mesh: mesh_names::GROUND,
        model: Mat4::IDENTITY,
        color: rgba(palette::LIGHT_GRAY),
        wire: false,
    });

    for (_, player) in roster.live_players(local_id) {
        push_capsule(&mut scene, Mat4::from_translation(player.position), bean_color(player.color));
    }

    // The player only sees their own capsule from outside.
    if bean.camera_mode == CameraMode::ThirdPerson {
        push_capsule(&mut scene, Mat4::from_translation(bean.position), bean_color(bean.color));
    }

    scene.ui = hud::gameplay_frame(gamepad_active);
    scene
}

fn push_capsule(scene: &mut FrameScene, model: Mat4, color: Vec4) {
    scene.instances.push(SceneInstance {
        mesh: mesh_names::BEAN,
        model,
        color,
        wire: false,
    });
    scene.instances.push(SceneInstance {
        mesh: mesh_names::BEAN,
        model,
        color: rgba(palette::BLACK),
        wire: true,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use bean_core::BeanColor;
    use glam::Vec3;

    fn setup() -> (BeanCamera, LocalBean, Roster) {
        let bean = LocalBean::new(BeanColor::new(1, 2, 3, 255));
        let mut camera = BeanCamera::default();
        camera.sync_with_bean(&bean);
        let mut roster = Roster::new();
        roster.upsert(0, Vec3::new(5.0, 1.7, 0.0), BeanColor::WHITE);
        roster.upsert(2, Vec3::new(-5.0, 1.7, 0.0), BeanColor::BLACK);
        (camera, bean, roster)
    }

    #[test]
    fn title_scene_has_no_camera() {
        let title = TitleScreen::new("1.2.3.4");
        let scene = title_scene(&title, 800.0, 450.0);
        assert!(scene.camera.is_none());
        assert!(scene.instances.is_empty());
        assert!(!scene.ui.texts.is_empty());
    }

    #[test]
    fn first_person_hides_own_bean() {
        let (camera, bean, roster) = setup();
        let scene = gameplay_scene(&camera, &bean, &roster, Some(1), false, 0.0);
        // Ground + 2 remote capsules, each with a wire pass.
        assert_eq!(scene.instances.len(), 1 + 2 * 2);
    }

    #[test]
    fn third_person_draws_own_bean() {
        let (mut camera, mut bean, roster) = setup();
        bean.set_camera_mode(CameraMode::ThirdPerson);
        camera.sync_with_bean(&bean);
        let scene = gameplay_scene(&camera, &bean, &roster, Some(1), false, 0.0);
        assert_eq!(scene.instances.len(), 1 + 3 * 2);
    }

    #[test]
    fn local_id_is_skipped() {
        let (camera, bean, roster) = setup();
        // Local player occupies slot 2; only slot 0 should draw.
        let scene = gameplay_scene(&camera, &bean, &roster, Some(2), false, 0.0);
        assert_eq!(scene.instances.len(), 1 + 1 * 2);
    }

    #[test]
    fn wires_are_black_and_paired() {
        let (camera, bean, roster) = setup();
        let scene = gameplay_scene(&camera, &bean, &roster, None, false, 0.0);
        let wires: Vec<_> = scene.instances.iter().filter(|i| i.wire).collect();
        assert_eq!(wires.len(), 2);
        for wire in wires {
            assert_eq!(wire.color.x, 0.0);
            assert_eq!(wire.mesh, mesh_names::BEAN);
        }
    }
}

//! End-to-end behaviour of the ink pipeline driven through the scheduler,
//! without a GPU.

use dither_ink::simulation::stage::advance;
use dither_ink::simulation::{CpuBackend, DitherParams, Field, FieldSize, PingPong, SimParams, SurfaceRect};
use dither_ink::{FrameScheduler, InkBackend, InkError, Settings, TickOutcome, Viewport};
use glam::Vec2;
use proptest::prelude::*;

/// Backend that only runs the simulation stage, for scenarios where the
/// full-resolution dither would only cost time.
#[derive(Default)]
struct SimulationOnly {
    fields: Option<PingPong<Field>>,
}

impl SimulationOnly {
    fn field(&self) -> &Field {
        self.fields.as_ref().expect("mounted").latest()
    }
}

impl InkBackend for SimulationOnly {
    fn allocate(&mut self, field: FieldSize, _viewport: &Viewport) -> Result<(), InkError> {
        self.fields = Some(PingPong::new(Field::new(field), Field::new(field)));
        Ok(())
    }

    fn advance(&mut self, params: &SimParams) -> Result<(), InkError> {
        let fields = self.fields.as_mut().expect("mounted");
        let (read, write) = fields.io_mut();
        advance(read, write, params);
        Ok(())
    }

    fn swap(&mut self) {
        self.fields.as_mut().expect("mounted").swap();
    }

    fn dither(&mut self, _params: &DitherParams) -> Result<(), InkError> {
        Ok(())
    }

    fn present(&mut self) -> Result<(), InkError> {
        Ok(())
    }

    fn release(&mut self) {
        self.fields = None;
    }
}

const FRAME: f32 = 1.0 / 60.0;

/// 1920x1080 viewport with a 120x68 field, so the default brush keeps its
/// reference size
fn full_hd() -> (FrameScheduler<SimulationOnly>, SurfaceRect) {
    let settings = Settings {
        resolution_scale: 1.0 / 16.0,
        ..Settings::default()
    };
    let scheduler =
        FrameScheduler::mount(SimulationOnly::default(), settings, Viewport::new(1920, 1080, 1.0)).unwrap();
    (scheduler, SurfaceRect::from_size(1920.0, 1080.0))
}

/// Screen coordinates for a uv position (v up)
fn to_screen(rect: SurfaceRect, uv: Vec2) -> (f32, f32) {
    (uv.x * rect.width, (1.0 - uv.y) * rect.height)
}

#[test]
fn stationary_pointer_disk_forms_then_fades() {
    let (mut scheduler, rect) = full_hd();
    assert_eq!(scheduler.field_size(), FieldSize::new(120, 68));
    let aspect = scheduler.field_size().aspect();
    let radius = 0.075;

    let (x, y) = to_screen(rect, Vec2::new(0.5, 0.5));
    scheduler.pointer_moved(x, y, rect);

    let mut peak_early = 0.0;
    for tick in 0..300 {
        assert_eq!(scheduler.tick(tick as f32 * FRAME).unwrap(), TickOutcome::Presented);
        let field = scheduler.backend().field();
        let max = field.max_value();
        assert!(max <= 0.95, "tick {tick}: {max}");

        if tick == 19 {
            peak_early = max;
            let center = field.sample(Vec2::new(0.5, 0.5));
            assert!(center > 0.5, "disk did not form: {center}");

            // Same aspect-corrected distance along both axes reads the same
            for d in [0.5 * radius, radius] {
                let horizontal = field.sample(Vec2::new(0.5 + d / aspect, 0.5));
                let vertical = field.sample(Vec2::new(0.5, 0.5 + d));
                assert!((horizontal - vertical).abs() < 0.15, "not round at {d}: {horizontal} vs {vertical}");
            }

            // Nothing far outside the brush
            let outside = field.sample(Vec2::new(0.5 + 3.0 * radius / aspect, 0.5));
            assert!(outside < 0.05, "ink outside the disk: {outside}");
        }

        if tick == 199 {
            // The gate closes once the pointer stops, so the disk fades
            assert!(max < peak_early, "disk kept growing: {max} >= {peak_early}");
        }
    }

    assert!(scheduler.backend().field().max_value() < 0.01);
}

#[test]
fn moving_pointer_leaves_trailing_streak() {
    let (mut scheduler, rect) = full_hd();

    let pointer_at = |tick: usize| Vec2::new(tick as f32 / 59.0, 0.5);

    for tick in 0..60 {
        let (x, y) = to_screen(rect, pointer_at(tick));
        scheduler.pointer_moved(x, y, rect);
        scheduler.tick(tick as f32 * FRAME).unwrap();

        if tick == 44 {
            let field = scheduler.backend().field();
            let pointer = pointer_at(tick).x;

            // Ink behind the pointer, none ahead of it
            let behind = field.sample(Vec2::new(pointer - 0.15, 0.5));
            let ahead = field.sample(Vec2::new(pointer + 0.15, 0.5));
            assert!(behind > 0.5, "no trail behind: {behind}");
            assert!(ahead < 0.01, "ink ahead of the pointer: {ahead}");

            // The densest ink lags the pointer
            let sample_row = |from: f32, to: f32| {
                (0..20)
                    .map(|i| field.sample(Vec2::new(from + (to - from) * i as f32 / 19.0, 0.5)))
                    .fold(0.0, f32::max)
            };
            assert!(sample_row(pointer - 0.1, pointer) > sample_row(pointer, pointer + 0.1));

            // The streak is horizontal
            assert!(field.sample(Vec2::new(pointer - 0.15, 0.8)) < 0.01);
            assert!(field.sample(Vec2::new(pointer - 0.15, 0.2)) < 0.01);
        }
    }

    let field = scheduler.backend().field();
    for i in 0..=12 {
        let x = 0.3 + 0.05 * i as f32;
        let value = field.sample(Vec2::new(x, 0.5));
        assert!(value > 0.2, "gap in streak at x={x}: {value}");
    }

    // Older ink has faded further
    assert!(field.sample(Vec2::new(0.85, 0.5)) > field.sample(Vec2::new(0.3, 0.5)));
}

#[test]
fn zero_opacity_keeps_mask_but_hides_output() {
    let viewport = Viewport::new(96, 54, 1.0);
    let rect = SurfaceRect::from_size(96.0, 54.0);
    let visible = Settings::default();
    let hidden = Settings {
        opacity: 0.0,
        ..Settings::default()
    };

    let mut lit = FrameScheduler::mount(CpuBackend::new(), visible, viewport).unwrap();
    let mut dark = FrameScheduler::mount(CpuBackend::new(), hidden, viewport).unwrap();

    for tick in 0..10 {
        let x = 20.0 + tick as f32 * 5.0;
        lit.pointer_moved(x, 27.0, rect);
        dark.pointer_moved(x, 27.0, rect);
        lit.tick(tick as f32 * FRAME).unwrap();
        dark.tick(tick as f32 * FRAME).unwrap();
    }

    let (lit, dark) = (lit.backend(), dark.backend());

    // Opacity never feeds back into the simulation
    assert_eq!(lit.field(), dark.field());
    assert_eq!(lit.mask(), dark.mask());
    assert!(lit.mask().iter().any(|&bit| bit == 1));

    for ((bit, lit_px), dark_px) in lit.mask().iter().zip(lit.frame()).zip(dark.frame()) {
        assert_eq!(dark_px[3], 0);
        assert_eq!(lit_px[3], if *bit == 1 { 255 } else { 0 });
        assert_eq!(lit_px[..3], dark_px[..3]);
    }
}

#[test]
fn zero_area_viewport_does_not_crash() {
    let mut scheduler =
        FrameScheduler::mount(CpuBackend::new(), Settings::default(), Viewport::new(0, 0, 1.0)).unwrap();
    scheduler.pointer_moved(1.0, 1.0, SurfaceRect::from_size(0.0, 0.0));
    assert_eq!(scheduler.tick(0.0).unwrap(), TickOutcome::Skipped);
    assert_eq!(scheduler.backend().field().unwrap().size(), FieldSize::new(1, 1));

    scheduler.request_resize(Viewport::new(32, 0, 2.0));
    assert_eq!(scheduler.tick(FRAME).unwrap(), TickOutcome::Skipped);

    scheduler.request_resize(Viewport::new(32, 16, 1.0));
    assert_eq!(scheduler.tick(2.0 * FRAME).unwrap(), TickOutcome::Presented);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn field_stays_within_bounds(
        path in prop::collection::vec((0.0f32..=1.0, 0.0f32..=1.0), 1..30),
        intensity in 0.0f32..4.0,
        decay in 0.0f32..0.05,
    ) {
        let settings = Settings {
            intensity,
            decay,
            resolution_scale: 0.1,
            ..Settings::default()
        };
        let mut scheduler =
            FrameScheduler::mount(SimulationOnly::default(), settings, Viewport::new(240, 160, 1.0)).unwrap();
        let rect = SurfaceRect::from_size(240.0, 160.0);

        for (tick, (u, v)) in path.into_iter().enumerate() {
            let (x, y) = to_screen(rect, Vec2::new(u, v));
            scheduler.pointer_moved(x, y, rect);
            scheduler.tick(tick as f32 * FRAME).unwrap();
            for &value in scheduler.backend().field().data() {
                prop_assert!((0.0..=0.95).contains(&value), "value {} out of range", value);
            }
        }
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// End-to-end behaviour of the scan pipeline on synthetic captures.

use keepsake_core::frame::{CHANNELS, luma};
use keepsake_core::{FaceRegion, FrameBuffer, ProcessingOptions, Rect};
use keepsake_scan::crop::{TARGET_ASPECT, aspect_crop_rect};
use keepsake_scan::detect::face::from_fn;
use keepsake_scan::{
    CenterFaceDetector, DarkestRegionDetector, ScanMetadata, ScanPipeline, Stage,
    crop_to_aspect_focused_on_face, detect_photo_edges, enhance, process, remove_glare,
};

// -- Fixtures -----------------------------------------------------------------

/// A 300x300 capture: dark table with a 200x180 print at (50, 60).
fn print_on_table() -> FrameBuffer {
    FrameBuffer::from_fn(300, 300, |x, y| {
        if (50..250).contains(&x) && (60..240).contains(&y) {
            [150 + (x % 50) as u8, 120, 100, 255]
        } else {
            [30, 30, 30, 255]
        }
    })
}

/// A bright, glossy capture with a hot spot in the middle.
fn glossy_print() -> FrameBuffer {
    FrameBuffer::from_fn(120, 90, |x, y| {
        let dx = x as i32 - 60;
        let dy = y as i32 - 45;
        if dx * dx + dy * dy < 400 {
            [252, 250, 248, 255]
        } else {
            [(x * 2) as u8, (y * 2) as u8, 140, 255]
        }
    })
}

fn all_option_sets() -> Vec<ProcessingOptions> {
    (0..16u8)
        .map(|bits| ProcessingOptions {
            auto_crop: bits & 1 != 0,
            face_aware_crop: bits & 2 != 0,
            remove_glare: bits & 4 != 0,
            enhance: bits & 8 != 0,
        })
        .collect()
}

fn only(stage: Stage) -> ProcessingOptions {
    let mut options = ProcessingOptions::none();
    match stage {
        Stage::AutoCrop => options.auto_crop = true,
        Stage::FaceAwareCrop => options.face_aware_crop = true,
        Stage::RemoveGlare => options.remove_glare = true,
        Stage::Enhance => options.enhance = true,
    }
    options
}

// -- Invariants -----------------------------------------------------------------

#[test]
fn every_output_satisfies_the_shape_invariant() {
    let pipeline = ScanPipeline::new();
    for frame in [print_on_table(), glossy_print(), FrameBuffer::filled(7, 3, [9, 9, 9, 9])] {
        for options in all_option_sets() {
            let result = pipeline.process(&frame, options);
            let out = result.frame();
            assert_eq!(
                out.pixels().len(),
                out.width() as usize * out.height() as usize * CHANNELS,
                "{options:?}"
            );
            assert_eq!(result.metadata().width, out.width());
            assert_eq!(result.metadata().height, out.height());
        }
    }
}

#[test]
fn crop_rectangles_stay_inside_the_frame() {
    for frame in [print_on_table(), glossy_print()] {
        if let Some(rect) = detect_photo_edges(&frame) {
            assert!(rect.fits_within(frame.width(), frame.height()));
        }
    }

    for (w, h) in [(100, 100), (1920, 1080), (1080, 1920), (33, 7), (7, 33), (2, 2)] {
        let frame = FrameBuffer::filled(w, h, [0, 0, 0, 255]);
        for face in [
            FaceRegion::new(0, 0, 0, 0),
            FaceRegion::new(w - 1, h - 1, 1, 1),
            FaceRegion::new(w / 3, h / 4, w / 2, h / 2),
            FaceRegion::new(u32::MAX / 2, 0, 10, 10),
        ] {
            if let Some(rect) = crop_to_aspect_focused_on_face(&frame, &face, TARGET_ASPECT) {
                assert!(rect.fits_within(w, h), "{rect} escapes {w}x{h}");
            }
        }
    }
}

#[test]
fn glare_removal_leaves_safe_images_alone() {
    let safe = FrameBuffer::from_fn(50, 50, |x, y| [(x * 4) as u8, (y * 4) as u8, 220, 255]);
    assert!(safe.pixels().chunks_exact(CHANNELS).all(|px| luma(px) <= 220.0));
    assert_eq!(remove_glare(&safe), safe);
}

#[test]
fn glare_removal_never_brightens() {
    let before = glossy_print();
    let after = remove_glare(&before);
    for (old, new) in before
        .pixels()
        .chunks_exact(CHANNELS)
        .zip(after.pixels().chunks_exact(CHANNELS))
    {
        assert!(luma(new) <= luma(old));
        assert_eq!(new[3], old[3]);
    }
    assert_ne!(after, before);
}

#[test]
fn reprocessing_is_deterministic() {
    let pipeline = ScanPipeline::new();
    let original = print_on_table();
    for options in all_option_sets() {
        assert_eq!(
            pipeline.process(&original, options),
            pipeline.process(&original, options)
        );
    }
}

#[test]
fn earlier_runs_do_not_affect_later_ones() {
    let pipeline = ScanPipeline::new();
    let original = glossy_print();
    let fresh = pipeline.process(&original, only(Stage::Enhance));

    let _ = pipeline.process(&original, ProcessingOptions::default());
    let _ = pipeline.process(&original, only(Stage::RemoveGlare));

    assert_eq!(pipeline.process(&original, only(Stage::Enhance)), fresh);
    assert_eq!(original, glossy_print());
}

#[test]
fn all_stages_off_returns_the_original() {
    for frame in [print_on_table(), glossy_print()] {
        let result = process(&frame, ProcessingOptions::none(), &CenterFaceDetector);
        assert_eq!(result.frame(), &frame);
        assert!(result.metadata().stages.is_empty());
        assert_eq!(result.options(), ProcessingOptions::none());
    }
}

// -- Scenarios ------------------------------------------------------------------

#[test]
fn mid_grey_enhancement_golden() {
    let frame = FrameBuffer::filled(100, 100, [128, 128, 128, 255]);
    let expected = ((0.0 * 1.3 + 128.0 + (128.0 - 128.0 * 0.3)) * 1.1_f64)
        .clamp(0.0, 255.0)
        .round() as u8;

    let result = ScanPipeline::new().process(&frame, only(Stage::Enhance));
    assert_eq!(result.frame().dimensions(), (100, 100));
    assert!(
        result
            .frame()
            .pixels()
            .chunks_exact(CHANNELS)
            .all(|px| px == [expected, expected, expected, 255])
    );
    assert_eq!(result.frame(), &enhance(&frame));
}

#[test]
fn low_contrast_background_is_not_cropped() {
    let frame = FrameBuffer::filled(160, 120, [200, 198, 196, 255]);
    assert_eq!(detect_photo_edges(&frame), None);

    let result = ScanPipeline::new().process(&frame, only(Stage::AutoCrop));
    assert_eq!(result.frame().dimensions(), (160, 120));
    assert_eq!(result.metadata().edge_crop, None);
    assert!(result.metadata().stages.is_empty());
}

#[test]
fn centred_face_on_square_frame() {
    let frame = FrameBuffer::filled(100, 100, [60, 60, 60, 255]);
    let face = FaceRegion::new(35, 35, 30, 30);
    let rect = crop_to_aspect_focused_on_face(&frame, &face, 16.0 / 9.0).unwrap();
    assert_eq!(rect.width, 100);
    assert_eq!(rect.height, 56);
    assert!(rect.y <= 44);
    assert_eq!(rect.y, 22);
}

#[test]
fn full_pipeline_crops_print_then_frames_face() {
    let result = ScanPipeline::new().process(&print_on_table(), ProcessingOptions::default());
    let meta = result.metadata();

    assert_eq!(meta.edge_crop, Some(Rect::new(45, 55, 210, 190)));
    assert_eq!(meta.face_crop, Some(Rect::new(0, 36, 210, 118)));
    assert_eq!(result.frame().dimensions(), (210, 118));
    assert_eq!(&meta.stages[..2], &[Stage::AutoCrop, Stage::FaceAwareCrop]);
    assert!((meta.aspect_ratio - 210.0 / 118.0).abs() < 1e-9);
    assert!(!meta.background.has_light_background);

    let face = meta.face.expect("face survives the crop");
    assert!(face.as_rect().fits_within(210, 118));
}

#[test]
fn metadata_serializes_with_snake_case_stages() {
    let result = ScanPipeline::new().process(&print_on_table(), ProcessingOptions::default());
    let json = serde_json::to_string(result.metadata()).unwrap();
    assert!(json.contains(r#""stages":["auto_crop","face_aware_crop""#), "{json}");
    assert!(json.contains(r#""edge_crop":{"x":45,"y":55,"width":210,"height":190}"#));
    assert!(json.contains(r#""has_light_background":false"#));

    let back: ScanMetadata = serde_json::from_str(&json).unwrap();
    let meta = result.metadata();
    assert_eq!(back.stages, meta.stages);
    assert_eq!((back.width, back.height), (meta.width, meta.height));
    assert_eq!(back.edge_crop, meta.edge_crop);
    assert_eq!(back.face_crop, meta.face_crop);
    assert_eq!(back.face, meta.face);
    assert!((back.aspect_ratio - meta.aspect_ratio).abs() < 1e-12);
    assert!((back.background.brightness - meta.background.brightness).abs() < 1e-12);
}

#[test]
fn degenerate_face_crop_leaves_the_frame_alone() {
    let frame = FrameBuffer::filled(1, 1000, [70, 70, 70, 255]);
    let result = ScanPipeline::new().process(&frame, only(Stage::FaceAwareCrop));
    assert_eq!(result.frame(), &frame);
    assert_eq!(result.metadata().face_crop, None);
    assert!(result.metadata().stages.is_empty());
}

#[test]
fn face_crop_runs_on_the_edge_cropped_frame() {
    let seen = std::sync::Mutex::new(Vec::new());
    let detector = from_fn(|frame: &FrameBuffer| {
        seen.lock().unwrap().push(frame.dimensions());
        None
    });
    let options = ProcessingOptions {
        auto_crop: true,
        face_aware_crop: true,
        ..ProcessingOptions::none()
    };
    let result = process(&print_on_table(), options, &detector);
    assert_eq!(seen.into_inner().unwrap(), vec![(210, 190)]);
    assert_eq!(result.frame().dimensions(), (210, 190));
    assert_eq!(result.metadata().stages, vec![Stage::AutoCrop]);
}

#[test]
fn darkest_region_detector_plugs_in() {
    let pipeline = ScanPipeline::with_detector(DarkestRegionDetector);
    let bright = FrameBuffer::filled(200, 100, [240, 240, 240, 255]);
    let result = pipeline.process(&bright, only(Stage::FaceAwareCrop));
    // Too bright for a face: no crop.
    assert_eq!(result.frame(), &bright);

    let boxed: ScanPipeline<Box<dyn keepsake_scan::FaceDetector>> =
        ScanPipeline::with_detector(Box::new(CenterFaceDetector));
    let result = boxed.process(&bright, only(Stage::FaceAwareCrop));
    assert_eq!(result.frame().dimensions(), (177, 100));
}

#[test]
fn malformed_raw_input_is_rejected_before_processing() {
    let called = std::sync::atomic::AtomicBool::new(false);
    let detector = from_fn(|_: &FrameBuffer| {
        called.store(true, std::sync::atomic::Ordering::SeqCst);
        None
    });
    let pipeline = ScanPipeline::with_detector(detector);
    let err = pipeline
        .process_raw(20, 10, &vec![0u8; 20 * 10 * 4 - 1], ProcessingOptions::default())
        .unwrap_err();
    assert!(err.is_malformed_input());
    assert!(!called.load(std::sync::atomic::Ordering::SeqCst));

    let ok = pipeline
        .process_raw(20, 10, &vec![0u8; 20 * 10 * 4], ProcessingOptions::none())
        .unwrap();
    assert_eq!(ok.frame().dimensions(), (20, 10));
}

// -- Concurrency ----------------------------------------------------------------

#[test]
fn batch_matches_individual_processing() {
    let pipeline = ScanPipeline::new();
    let frames = vec![
        print_on_table(),
        glossy_print(),
        FrameBuffer::filled(16, 9, [5, 5, 5, 255]),
    ];
    let batch = pipeline.process_batch(&frames, ProcessingOptions::default());
    assert_eq!(batch.len(), frames.len());
    for (frame, result) in frames.iter().zip(&batch) {
        assert_eq!(result, &pipeline.process(frame, ProcessingOptions::default()));
    }
}

#[test]
fn concurrent_calls_share_one_pipeline() {
    let pipeline = ScanPipeline::new();
    let original = print_on_table();
    let expected = pipeline.process(&original, ProcessingOptions::default());

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| pipeline.process(&original, ProcessingOptions::default())))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn aspect_crop_rect_matches_frame_variant() {
    let frame = print_on_table();
    let face = FaceRegion::new(10, 10, 20, 20);
    assert_eq!(
        crop_to_aspect_focused_on_face(&frame, &face, TARGET_ASPECT),
        aspect_crop_rect(300, 300, &face, TARGET_ASPECT)
    );
}

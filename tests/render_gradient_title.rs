use og_image::{
    ColorStop, FontSource, GradientTitle, LinearGradient, RenderConfig, Rgb8, Style, render,
};

fn brand_stops() -> Vec<ColorStop> {
    vec![
        ColorStop::new(0.00, Rgb8::new(44, 30, 74)),
        ColorStop::new(0.42, Rgb8::new(213, 130, 94)),
        ColorStop::new(0.72, Rgb8::new(169, 154, 184)),
        ColorStop::new(1.00, Rgb8::new(150, 161, 205)),
    ]
}

fn close(a: [u8; 3], b: [u8; 3], tol: u8) -> bool {
    a.iter().zip(b).all(|(x, y)| x.abs_diff(y) <= tol)
}

fn small_config() -> RenderConfig {
    RenderConfig {
        width: 240,
        height: 126,
        oversample: 3,
        font: None,
        system_fonts: false,
        style: Style::GradientTitle(GradientTitle {
            width_fraction: 0.82,
            stops: brand_stops(),
        }),
        ..RenderConfig::default()
    }
}

#[test]
fn oversampled_gradient_hits_the_stop_colors() {
    let g = LinearGradient::new(brand_stops()).unwrap();
    let img = g.render(3600, 1890);
    assert_eq!(img.dimensions(), (3600, 1890));

    assert_eq!(img.get_pixel(0, 0).0, [44, 30, 74]);
    assert_eq!(img.get_pixel(0, 1889).0, [44, 30, 74]);
    assert_eq!(img.get_pixel(3599, 0).0, [150, 161, 205]);
    assert_eq!(img.get_pixel(3599, 1889).0, [150, 161, 205]);
    assert!(close(img.get_pixel(1512, 945).0, [213, 130, 94], 2));
}

#[test]
fn render_produces_output_size_with_background_and_text() {
    let cfg = small_config();
    let out = render(&cfg).unwrap();
    let img = &out.image;
    assert_eq!(img.dimensions(), (240, 126));

    // Corners are far from the title and stay near-black.
    for (x, y) in [(0, 0), (239, 0), (0, 125), (239, 125)] {
        assert!(close(img.get_pixel(x, y).0, [10, 10, 12], 1), "({x}, {y})");
    }

    // The centre row crosses the title, so some pixels carry gradient colour.
    let lit = (0..240)
        .map(|x| img.get_pixel(x, 63).0)
        .filter(|p| !close(*p, [10, 10, 12], 4))
        .count();
    assert!(lit > 10, "only {lit} lit pixels on the centre row");

    assert_eq!(out.fonts.len(), 1);
    assert_eq!(out.fonts[0].source, FontSource::Builtin);
    assert!(out.fonts[0].fallback_reason.is_none());
}

#[test]
fn text_takes_colour_from_the_gradient_column() {
    let mut cfg = small_config();
    cfg.oversample = 1;
    cfg.title = "IIIIIIIIIIII".to_owned();
    let img = render(&cfg).unwrap().image;

    // Without downsampling, fully covered pixels are exact gradient samples.
    let g = LinearGradient::new(brand_stops()).unwrap();
    let cols = g.column_colors(240);
    let mut hits = 0;
    for (x, _, p) in img.enumerate_pixels() {
        let c = cols[x as usize];
        if p.0 == [c.r, c.g, c.b] {
            hits += 1;
        }
    }
    assert!(hits > 100, "{hits}");
}

#[test]
fn rendering_is_deterministic() {
    let cfg = small_config();
    let a = render(&cfg).unwrap().image;
    let b = render(&cfg).unwrap().image;
    assert_eq!(a, b);
}

#[test]
fn invalid_stops_abort_before_rendering() {
    let mut cfg = small_config();
    cfg.style = Style::GradientTitle(GradientTitle {
        width_fraction: 0.82,
        stops: vec![ColorStop::new(0.0, Rgb8::BLACK)],
    });
    let err = render(&cfg).unwrap_err();
    assert!(err.to_string().contains("validation error:"));
}

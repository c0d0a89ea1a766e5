use pagefx::{EffectsConfig, PageEffects, Viewport};

const PAGE: &str = r##"<html><head><title>Demo Portfolio</title></head><body>
    <nav><a href="#home">Home</a><a href="#projects">Projects</a><a href="#contact">Contact</a></nav>
    <section id="home"><div class="hero-content"><h1>Demo</h1><p>Scroll me</p></div></section>
    <section id="projects">
        <h2 class="section-heading">Projects</h2>
        <div class="project-card">One</div>
        <div class="project-card">Two</div>
    </section>
    <section id="contact">
        <h2 class="section-heading">Contact</h2>
        <form class="contact-form"><input id="email" type="email" value="demo@example.com"></form>
    </section>
</body></html>"##;

fn main() -> anyhow::Result<()> {
    let config = EffectsConfig {
        viewport: Viewport {
            width: 1280,
            height: 800,
        },
        ..Default::default()
    };
    let mut engine = pagefx::new_engine(config)?;

    engine.on_load(|summary| {
        println!(
            "loaded {:?}: sections {:?}, {} watched blocks, {} same-page links",
            summary.title, summary.sections, summary.trackables, summary.anchors
        );
    });
    engine.on_nav(|change| println!("nav -> {:?}", change.active));
    engine.on_reveal(|ev| println!("reveal -> .{} (#{})", ev.class, ev.index));
    engine.on_notice(|notice| println!("notice -> {}", notice.message));

    engine.load_html(PAGE, None)?;

    // Scroll through the page the way a reader would
    for y in (0..=1600).step_by(200) {
        engine.scroll_to(f64::from(y));
        engine.run_frames(6);
    }

    // Jump back to the projects via the nav link, then say hello
    engine.click_anchor("#projects");
    engine.run_frames(60);
    engine.submit_form();

    let snap = engine.snapshot()?;
    print!("{}", snap.describe());
    println!("digest: {}", snap.digest()?);

    Ok(())
}

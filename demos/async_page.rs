#[cfg(not(feature = "fetch"))]
fn main() {
    eprintln!("example requires the 'fetch' feature; run: cargo run --example async_page");
}

#[cfg(feature = "fetch")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use pagefx::Page;

    // Serve a tiny page so the demo is repeatable without a real site
    let server = tiny_http::Server::http("0.0.0.0:0").unwrap();
    let addr = server.server_addr();

    std::thread::spawn(move || {
        if let Ok(req) = server.recv() {
            let html = r##"<html><head><title>Async Demo</title></head><body>
                <nav><a href="#home">Home</a><a href="#about">About</a></nav>
                <section id="home"><div class="hero-content"><h1>Async</h1></div></section>
                <section id="about"><h2 class="section-heading">About</h2><p class="about-text">Hi</p></section>
            </body></html>"##;
            let _ = req.respond(tiny_http::Response::from_string(html));
        }
    });

    let page = Page::new(None).await?;
    page.goto(&format!("http://{}", addr)).await?;

    page.scroll_to(700.0).await?;
    page.run_frames(45).await?;

    let snap = page.snapshot().await?;
    println!(
        "title: {}\nactive section: {:?}\nwatched blocks left: {}",
        snap.title, snap.active_section, snap.watched
    );
    for t in &snap.trackables {
        println!("  .{} is {}", t.class, t.phase);
    }

    page.close().await?;
    Ok(())
}

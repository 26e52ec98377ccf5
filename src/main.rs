mod model_viewer;

fn main() -> anyhow::Result<()> {
    model_viewer::viewer::run()
}

fn main() -> Result<(), eframe::Error> {
    // Set up logging for development
    env_logger::init();

    drill_designer::run_app()
}

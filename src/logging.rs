pub fn init() {
    use env_logger::Target;
    use std::fs;
    use std::io;

    // The TUI owns the terminal while we run, so prefer a log file. If we
    // cannot open it (readonly FS, etc.), fall back to stderr.
    let target = (|| -> io::Result<Target> {
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/var/log/snapper-rollback.log")?;
        Ok(Target::Pipe(Box::new(file)))
    })()
    .unwrap_or(Target::Stderr);

    env_logger::Builder::from_default_env()
        .target(target)
        .filter_level(log::LevelFilter::Info)
        .init();
}

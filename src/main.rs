fn main() -> anyhow::Result<()> {
    snapper_rollback::run()
}

fn main() -> anyhow::Result<()> {
    nihongo_daily_lib::run()
}

fn main() -> anyhow::Result<()> {
    clientpack_lib::main()
}

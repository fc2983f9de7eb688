fn main() -> std::process::ExitCode {
    dash_chamados::run()
}

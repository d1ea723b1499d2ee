fn main() {
    archmatrix::run_cli();
}

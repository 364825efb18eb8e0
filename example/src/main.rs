fn main() {
    example::run()
}

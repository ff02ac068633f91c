fn main() {
    levelsight_lib::run()
}

fn main() {
    // Propagates the ESP-IDF build environment when targeting espidf;
    // prints nothing on plain host builds.
    embuild::espidf::sysenv::output();
}

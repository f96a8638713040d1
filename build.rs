fn main() {
    println!("cargo:rerun-if-env-changed=WAKELAMP_WIFI_SSID");
    println!("cargo:rerun-if-env-changed=WAKELAMP_WIFI_PASS");
    println!("cargo:rerun-if-env-changed=WAKELAMP_CONFIG_JSON");

    // Host builds (tests, fuzzing) never link ESP-IDF.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}

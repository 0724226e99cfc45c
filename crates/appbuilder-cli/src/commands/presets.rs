pub fn presets() {
    for preset in appbuilder::presets() {
        println!("{:<20} {}", preset.id, preset.name);
        println!("{:<20} {}", "", preset.description);
    }
}

use natal_core::{build_chart, BirthData, Ephemeris, GeoPoint};

fn main() {
    let eph = Ephemeris::new();
    // Reference chart: 2025-03-21 15:30 local, Edmonton.
    let birth = BirthData {
        name: "Demo".to_string(),
        date: "2025-03-21".to_string(),
        time: "15:30".to_string(),
        location: GeoPoint::edmonton(),
    };

    match build_chart(&eph, &birth) {
        Ok(chart) => {
            println!("{:#?}", chart);
            match serde_json::to_string_pretty(&chart) {
                Ok(json) => println!("{}", json),
                Err(e) => eprintln!("Error serializing chart: {:?}", e),
            }
        }
        Err(e) => eprintln!("Error: {:?}", e),
    }
}

use gstin_tracker::core::*;

fn main() {
    println!("=== GSTIN Format Validation ===\n");

    let test_ids = [
        "27AAPFU0939F1ZV",
        "24aaacc1206d1zm", // lower case
        "29AABCT1332L1ZD", // wrong check digit
        "27AAPFU0939F1Z",  // too short
        "88AAACT2983B1Z9", // transporter ID
    ];

    for id in &test_ids {
        match validate_gstin(id) {
            Ok(gstin) => println!(
                "  {id} => valid ({gstin}, {:?})",
                gstin_category(&gstin).expect("validated GSTIN has a category")
            ),
            Err(e) => println!("  {id} => INVALID: {e}"),
        }
    }

    println!("\n=== Transporter ID Routing ===\n");

    for id in ["88AAACT2983B1Z9", "29AABCT1332L1ZD", "27AAPFU0939F1ZV"] {
        let route = if needs_transporter_api(id) {
            "e-waybill transporter API"
        } else {
            "GSTIN API"
        };
        println!("  {id} => {route}");
    }
}

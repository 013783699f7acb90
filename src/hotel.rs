use serde::{Deserialize, Serialize};

pub type HotelId = u64;

// Hotel as served by the backend; read-only on the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    pub id: HotelId,
    pub name: String,
    pub location: String,
    pub price_per_night: f64,
    pub rating: f64,
    #[serde(default)]
    pub available_rooms: u32,
    #[serde(default)]
    pub image_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_backend_hotel() {
        let json = r#"{
            "id": 7,
            "name": "Grand Plaza",
            "location": "Lisbon, Portugal",
            "pricePerNight": 180,
            "rating": 4.6,
            "availableRooms": 12,
            "imageUrl": "https://img.example.com/plaza.jpg"
        }"#;

        let hotel: Hotel = serde_json::from_str(json).unwrap();
        assert_eq!(hotel.id, 7);
        assert_eq!(hotel.price_per_night, 180.0);
        assert_eq!(hotel.available_rooms, 12);
        assert_eq!(hotel.image_url, "https://img.example.com/plaza.jpg");
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let json = r#"{"id":1,"name":"Inn","location":"Oslo","pricePerNight":90.5,"rating":3.9}"#;

        let hotel: Hotel = serde_json::from_str(json).unwrap();
        assert_eq!(hotel.available_rooms, 0);
        assert!(hotel.image_url.is_empty());
    }
}

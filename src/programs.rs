//! School programs
//!
//! Curriculum-linked field trip programs, discovered by grade level. This
//! catalog is informational only: programs are booked through the contact
//! channel, nothing here touches storage.

/// Grade levels programs can be filtered by
pub const GRADE_LEVELS: [&str; 7] = ["6th", "7th", "8th", "9th", "10th", "11th", "12th"];

/// Program category
#[derive(Clone, Copy, Debug)]
pub enum Category {
    /// City heritage circuits
    Heritage,

    /// Industry exposure visits
    Industry,

    /// Startup ecosystem exposure
    Entrepreneurship,
}

/// One stop on a program itinerary
#[derive(Debug)]
pub struct ItineraryStop {
    /// Start time, e.g. "8:00 AM"
    pub time: &'static str,

    /// What happens at that time
    pub activity: &'static str,
}

/// A curriculum-linked field trip program
#[derive(Debug)]
pub struct Program {
    pub id: u32,
    pub title: &'static str,
    pub category: Category,
    /// Free-text duration, e.g. "1 Day"
    pub duration: &'static str,
    pub locations: &'static [&'static str],
    pub description: &'static str,
    pub skills: &'static [&'static str],
    pub subjects: &'static [&'static str],
    /// Grade levels the program is suitable for
    pub suitable_for: &'static [&'static str],
    pub itinerary: &'static [ItineraryStop],
}

impl Program {
    /// Is the program suitable for a grade level?
    pub fn suits_grade(&self, grade: &str) -> bool {
        self.suitable_for.contains(&grade)
    }
}

/// The full program catalog
pub fn catalog() -> &'static [Program] {
    &CATALOG
}

/// Programs suitable for a grade level
///
/// An unknown grade simply matches nothing.
pub fn for_grade(grade: &str) -> Vec<&'static Program> {
    CATALOG
        .iter()
        .filter(|program| program.suits_grade(grade))
        .collect()
}

static CATALOG: [Program; 4] = [
    Program {
        id: 1,
        title: "Chennai Heritage & Skills Circuit",
        category: Category::Heritage,
        duration: "1 Day",
        locations: &["Pallavaram Market", "Ripon Building", "Fort St. George"],
        description: "An immersive one-day experience combining practical life skills with \
            Indian history. Students will learn negotiation skills at Pallavaram Market and \
            explore India's independence history at Ripon Building.",
        skills: &[
            "Negotiation Skills",
            "Historical Understanding",
            "Cultural Awareness",
            "Communication",
        ],
        subjects: &["History", "Social Studies", "Economics"],
        suitable_for: &["6th", "7th", "8th", "9th", "10th", "11th", "12th"],
        itinerary: &[
            ItineraryStop {
                time: "8:00 AM",
                activity: "Departure from school",
            },
            ItineraryStop {
                time: "9:00 AM",
                activity: "Pallavaram Market - Negotiation skills workshop",
            },
            ItineraryStop {
                time: "12:00 PM",
                activity: "Lunch break",
            },
            ItineraryStop {
                time: "1:00 PM",
                activity: "Ripon Building - Indian Independence history tour",
            },
            ItineraryStop {
                time: "3:00 PM",
                activity: "Fort St. George - Colonial history exploration",
            },
            ItineraryStop {
                time: "5:00 PM",
                activity: "Return to school",
            },
        ],
    },
    Program {
        id: 2,
        title: "Chennai Innovation Trail",
        category: Category::Heritage,
        duration: "1 Day",
        locations: &["Tech Park", "IIT Madras", "Innovation Center"],
        description: "Experience Chennai's innovation ecosystem with visits to leading tech \
            companies and educational institutions.",
        skills: &[
            "Innovation Thinking",
            "Technology Awareness",
            "Problem Solving",
            "Career Guidance",
        ],
        subjects: &["Science", "Technology", "Computer Science"],
        suitable_for: &["9th", "10th", "11th", "12th"],
        itinerary: &[
            ItineraryStop {
                time: "8:00 AM",
                activity: "School pickup",
            },
            ItineraryStop {
                time: "9:30 AM",
                activity: "Tech Park tour and interaction with professionals",
            },
            ItineraryStop {
                time: "12:00 PM",
                activity: "Lunch at campus cafeteria",
            },
            ItineraryStop {
                time: "1:30 PM",
                activity: "IIT Madras - Research lab visits",
            },
            ItineraryStop {
                time: "3:30 PM",
                activity: "Innovation Center - Hands-on workshop",
            },
            ItineraryStop {
                time: "5:30 PM",
                activity: "Return journey",
            },
        ],
    },
    Program {
        id: 3,
        title: "Manufacturing Industry Visit",
        category: Category::Industry,
        duration: "Half Day",
        locations: &["Automotive Plant", "Quality Control Lab"],
        description: "Get hands-on exposure to manufacturing processes and quality management \
            in a real industrial setting.",
        skills: &[
            "Process Understanding",
            "Quality Management",
            "Safety Protocols",
            "Industrial Awareness",
        ],
        subjects: &["Physics", "Chemistry", "Engineering"],
        suitable_for: &["10th", "11th", "12th"],
        itinerary: &[
            ItineraryStop {
                time: "9:00 AM",
                activity: "Industry arrival and safety briefing",
            },
            ItineraryStop {
                time: "9:30 AM",
                activity: "Production floor tour",
            },
            ItineraryStop {
                time: "11:00 AM",
                activity: "Quality control lab demonstration",
            },
            ItineraryStop {
                time: "12:00 PM",
                activity: "Q&A session with engineers",
            },
            ItineraryStop {
                time: "1:00 PM",
                activity: "Departure",
            },
        ],
    },
    Program {
        id: 4,
        title: "Startup Ecosystem Exposure",
        category: Category::Entrepreneurship,
        duration: "1 Day",
        locations: &["Incubation Center", "Co-working Space", "Startup Office"],
        description: "Explore the world of startups and entrepreneurship with visits to \
            incubation centers and interactions with young entrepreneurs.",
        skills: &[
            "Entrepreneurial Mindset",
            "Business Planning",
            "Networking",
            "Innovation",
        ],
        subjects: &["Business Studies", "Economics", "Entrepreneurship"],
        suitable_for: &["9th", "10th", "11th", "12th"],
        itinerary: &[
            ItineraryStop {
                time: "9:00 AM",
                activity: "Incubation center tour",
            },
            ItineraryStop {
                time: "10:30 AM",
                activity: "Interaction with startup founders",
            },
            ItineraryStop {
                time: "12:00 PM",
                activity: "Lunch with entrepreneurs",
            },
            ItineraryStop {
                time: "1:30 PM",
                activity: "Co-working space experience",
            },
            ItineraryStop {
                time: "3:00 PM",
                activity: "Workshop on idea generation",
            },
            ItineraryStop {
                time: "5:00 PM",
                activity: "Wrap-up and departure",
            },
        ],
    },
];

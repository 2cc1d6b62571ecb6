use crate::card::{Color, DestinationCard};
use crate::city::{City, CityToCity};
use crate::error::GameError;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use strum_macros::Display;

/// Whether a route is travelled by train or by boat.
#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RouteKind {
    /// Paid with land cards, and occupied with wagon pieces.
    Land,
    /// Paid with sea cards, and occupied with boat pieces.
    Sea,
}

/// A route between two adjacent cities.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Route {
    /// Unique label, under which the route is offered to players.
    pub name: String,
    pub cities: CityToCity,
    /// The `Grey` color means that any single color matches.
    pub color: Color,
    /// Number of capture units (and pieces) needed to capture the route.
    pub length: u8,
    pub kind: RouteKind,
    /// Points granted when capturing the route.
    /// A dataset may leave it out, in which case [`Route::points_for_length`] applies.
    #[serde(default)]
    pub points: u8,
}

impl Route {
    /// Creates a route worth the standard number of points for its length.
    pub fn new(name: &str, (start, end): (&str, &str), color: Color, length: u8, kind: RouteKind) -> Self {
        Self {
            name: name.to_owned(),
            cities: (start.to_owned(), end.to_owned()),
            color,
            length,
            kind,
            points: Self::points_for_length(length),
        }
    }

    /// The standard scoring table of routes.
    ///
    /// # Example
    /// ```
    /// use rails_and_sails::map::Route;
    ///
    /// assert_eq!(Route::points_for_length(3), 4);
    /// assert_eq!(Route::points_for_length(8), 21);
    /// ```
    pub fn points_for_length(length: u8) -> u8 {
        match length {
            1 => 1,
            2 => 2,
            3 => 4,
            4 => 7,
            5 => 10,
            6 => 15,
            7 => 18,
            8 => 21,
            _ => 0,
        }
    }

    /// Whether one of the route's ends is the given city.
    #[inline]
    pub fn touches(&self, city: &str) -> bool {
        self.cities.0 == city || self.cities.1 == city
    }
}

/// The immutable content of a map: every city, route and destination ticket of the game.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct MapData {
    pub cities: Vec<City>,
    pub routes: Vec<Route>,
    pub destinations: Vec<DestinationCard>,
}

/// The mutable state of the map, per game: what can still be captured, built, or drawn.
///
/// Routes and ports leave it for good when claimed. Destination tickets only move between this
/// pool and players.
#[derive(Debug)]
pub struct Map {
    cities: Vec<City>,
    free_ports: Vec<City>,
    free_routes: Vec<Route>,
    destination_deck: VecDeque<DestinationCard>,
}

impl Map {
    /// Builds the state of a new game out of a map dataset.
    ///
    /// Returns an `Err` if either:
    ///   * A route or a destination ticket references a city missing from the dataset.
    ///   * Two routes or ports share a name, as players pick them by name.
    ///
    /// # Example
    /// ```
    /// use rails_and_sails::card::Color;
    /// use rails_and_sails::city::City;
    /// use rails_and_sails::map::{Map, MapData, Route, RouteKind};
    ///
    /// let data = MapData {
    ///     cities: vec![City::new("Lima", true), City::new("Cuzco", false)],
    ///     routes: vec![Route::new("R1", ("Lima", "Cuzco"), Color::Red, 2, RouteKind::Land)],
    ///     destinations: vec![],
    /// };
    ///
    /// let map = Map::new(data).unwrap();
    /// assert_eq!(map.free_routes().len(), 1);
    /// assert_eq!(map.free_ports().len(), 1);
    /// ```
    pub fn new(data: MapData) -> Result<Self, GameError> {
        let known_cities: HashSet<&str> = data.cities.iter().map(|city| city.name.as_str()).collect();

        let route_cities = data
            .routes
            .iter()
            .flat_map(|route| [&route.cities.0, &route.cities.1]);
        let destination_cities = data.destinations.iter().flat_map(|destination| &destination.cities);

        if let Some(unknown_city) = route_cities
            .chain(destination_cities)
            .find(|city| !known_cities.contains(city.as_str()))
        {
            return Err(GameError::UnknownCity(unknown_city.clone()));
        }

        let mut labels = HashSet::new();
        let route_names = data.routes.iter().map(|route| route.name.as_str());
        let port_names = data
            .cities
            .iter()
            .filter(|city| city.is_port)
            .map(|city| city.name.as_str());

        if let Some(duplicate) = route_names.chain(port_names).find(|label| !labels.insert(*label)) {
            return Err(GameError::DuplicateLabel(duplicate.to_owned()));
        }

        let free_routes = data
            .routes
            .into_iter()
            .map(|mut route| {
                if route.points == 0 {
                    route.points = Route::points_for_length(route.length);
                }
                route
            })
            .collect();

        Ok(Self {
            free_ports: data.cities.iter().filter(|city| city.is_port).cloned().collect(),
            cities: data.cities,
            free_routes,
            destination_deck: VecDeque::from(data.destinations),
        })
    }

    #[inline]
    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    #[inline]
    pub fn free_routes(&self) -> &[Route] {
        &self.free_routes
    }

    #[inline]
    pub fn free_ports(&self) -> &[City] {
        &self.free_ports
    }

    pub fn free_route(&self, name: &str) -> Option<&Route> {
        self.free_routes.iter().find(|route| route.name == name)
    }

    pub fn free_port(&self, name: &str) -> Option<&City> {
        self.free_ports.iter().find(|city| city.name == name)
    }

    /// Removes a route from the free routes, and hands it over to the caller.
    ///
    /// Callers are expected to have checked that the route is free: an `Err` here is a bug.
    pub fn claim_route(&mut self, name: &str) -> Result<Route, GameError> {
        match self.free_routes.iter().position(|route| route.name == name) {
            Some(index) => Ok(self.free_routes.remove(index)),
            None => Err(GameError::RouteNotFound(name.to_owned())),
        }
    }

    /// Removes a port from the free ports, and hands it over to the caller.
    ///
    /// Callers are expected to have checked that the port is free: an `Err` here is a bug.
    pub fn claim_port(&mut self, name: &str) -> Result<City, GameError> {
        match self.free_ports.iter().position(|city| city.name == name) {
            Some(index) => Ok(self.free_ports.remove(index)),
            None => Err(GameError::PortNotFound(name.to_owned())),
        }
    }

    pub fn shuffle_destinations<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.destination_deck.make_contiguous().shuffle(rng);
    }

    /// Removes and returns the first `n` destination tickets of the pool.
    ///
    /// Returns fewer tickets if there are less than `n` left.
    pub fn draw_top_destinations(&mut self, n: usize) -> Vec<DestinationCard> {
        let n = n.min(self.destination_deck.len());
        self.destination_deck.drain(..n).collect()
    }

    /// Removes and returns `n` distinct destination tickets, picked uniformly at random in the pool.
    ///
    /// Returns fewer tickets if there are less than `n` left.
    pub fn draw_random_destinations<R: Rng + ?Sized>(&mut self, n: usize, rng: &mut R) -> Vec<DestinationCard> {
        let n = n.min(self.destination_deck.len());
        let mut drawn_destinations = Vec::with_capacity(n);

        for _ in 0..n {
            let index = rng.gen_range(0..self.destination_deck.len());
            if let Some(destination) = self.destination_deck.remove(index) {
                drawn_destinations.push(destination);
            }
        }

        drawn_destinations
    }

    /// Puts destination tickets back at the bottom of the pool.
    pub fn return_destinations(&mut self, destinations: impl IntoIterator<Item = DestinationCard>) {
        self.destination_deck.extend(destinations);
    }

    #[inline]
    pub fn destination_deck_len(&self) -> usize {
        self.destination_deck.len()
    }

    /// Accessor to the destination ticket pool.
    ///
    /// Should only be used for testing!
    pub fn get_destination_deck(&self) -> &VecDeque<DestinationCard> {
        &self.destination_deck
    }

    /// Predicate that assesses whether the given routes connect all the given cities together.
    ///
    /// Only the given routes are walked through, so passing a player's captured routes tells
    /// whether that player has completed a destination ticket.
    ///
    /// # Example
    /// ```
    /// use rails_and_sails::card::Color;
    /// use rails_and_sails::map::{Map, Route, RouteKind};
    ///
    /// let destination = [String::from("Lima"), String::from("Quito")];
    /// let mut routes = vec![Route::new("R1", ("Lima", "Cuzco"), Color::Red, 2, RouteKind::Land)];
    /// assert!(!Map::connects(&routes, &destination));
    ///
    /// routes.push(Route::new("R2", ("Quito", "Cuzco"), Color::Grey, 3, RouteKind::Sea));
    /// assert!(Map::connects(&routes, &destination));
    /// ```
    pub fn connects(routes: &[Route], cities: &[String]) -> bool {
        let (start, rest) = match cities.split_first() {
            Some(split) => split,
            None => return true,
        };

        let mut neighbors: HashMap<&str, Vec<&str>> = HashMap::new();
        for route in routes {
            let (city_a, city_b) = (route.cities.0.as_str(), route.cities.1.as_str());
            neighbors.entry(city_a).or_default().push(city_b);
            neighbors.entry(city_b).or_default().push(city_a);
        }

        let mut cities_visited = HashSet::from([start.as_str()]);
        let mut cities_to_visit = VecDeque::from([start.as_str()]);

        while let Some(city) = cities_to_visit.pop_front() {
            for neighbor in neighbors.get(city).into_iter().flatten() {
                if cities_visited.insert(neighbor) {
                    cities_to_visit.push_back(neighbor);
                }
            }
        }

        rest.iter().all(|city| cities_visited.contains(city.as_str()))
    }
}
